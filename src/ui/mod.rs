pub mod gauges;
pub mod panels;
pub mod table;
