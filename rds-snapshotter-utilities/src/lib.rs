pub mod ffiutils;
pub mod logger;
pub mod startup;
