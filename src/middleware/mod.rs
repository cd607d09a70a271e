/// Middleware module
///
/// Request logging and static-file hit counting.

mod hit_counter;
mod request_logger;

pub use hit_counter::HitCounterMiddleware;
pub use request_logger::RequestLogger;
