pub mod ratesapi;
