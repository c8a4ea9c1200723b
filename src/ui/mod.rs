pub mod charts;
pub mod insights;
pub mod panels;
