mod dns;

pub use dns::DotServices;
