mod invoker;

pub use invoker::*;
