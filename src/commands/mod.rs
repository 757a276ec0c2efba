// Command handlers module
pub mod dashboard;

// Re-exports for cleaner imports
pub use dashboard::execute as dashboard;
