pub mod adapter;

pub use adapter::{Adaptee, ConcreteAdapter, Target};
