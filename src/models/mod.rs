pub mod blog;
mod shared;
