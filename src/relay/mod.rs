pub mod broadcaster;
pub mod task;

// Re-export the main types for easy access
pub use task::relay_task;
