//! 适配器：把接口不兼容的 [`Adaptee`] 包装成调用方期望的 [`Target`]

/// 调用方期望的接口
pub trait Target {
    fn request(&self) -> String;
}

/// 已有实现，接口与 [`Target`] 不兼容
#[derive(Debug, Default, Clone)]
pub struct Adaptee;

impl Adaptee {
    pub fn new() -> Self {
        Self
    }

    pub fn specific_request(&self) -> String {
        "Called SpecificRequest()".to_string()
    }
}

/// 持有 [`Adaptee`] 并通过委托实现 [`Target`]
#[derive(Debug, Clone)]
pub struct ConcreteAdapter {
    adaptee: Adaptee,
}

impl ConcreteAdapter {
    pub fn new(adaptee: Adaptee) -> Self {
        Self { adaptee }
    }
}

impl Target for ConcreteAdapter {
    fn request(&self) -> String {
        self.adaptee.specific_request()
    }
}

impl From<Adaptee> for ConcreteAdapter {
    fn from(adaptee: Adaptee) -> Self {
        Self::new(adaptee)
    }
}
