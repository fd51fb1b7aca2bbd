pub mod datastruct;
pub mod math;
pub mod similarity;
pub mod sort;
pub mod typicality;
