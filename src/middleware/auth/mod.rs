pub mod gate;
pub mod interceptor;
