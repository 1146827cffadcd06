pub mod dates;
pub mod export;
pub mod filter;
pub mod indicator;
pub mod observation;
pub mod paths;
pub mod scale;
