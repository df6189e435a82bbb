use std::fmt;

/// Data types of the ac language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DataType {
    Int,
    Float,
}

impl DataType {
    /// The wider of two types: `Float` if either side is `Float`.
    pub fn generalize(self, other: DataType) -> DataType {
        if self == DataType::Float || other == DataType::Float {
            DataType::Float
        } else {
            DataType::Int
        }
    }

    /// Only int -> float widening (and the identity) is allowed.
    pub fn can_convert_to(self, to: DataType) -> bool {
        self == to || (self == DataType::Int && to == DataType::Float)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Int => write!(f, "INT"),
            DataType::Float => write!(f, "FLOAT"),
        }
    }
}

/// Float constant kept as its decimal digits, so widening and emission
/// never round through `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Decimal {
    text: String,
    value: f64,
}

impl Decimal {
    /// Parses `digits '.' digits*`; `None` when the value is not a finite `f64`.
    pub fn parse(text: &str) -> Option<Decimal> {
        let value: f64 = text.parse().ok().filter(|v: &f64| v.is_finite())?;
        let mut text = text.to_string();
        if text.ends_with('.') {
            text.push('0');
        }
        Some(Decimal { text, value })
    }

    pub fn from_int(n: i64) -> Decimal {
        Decimal {
            text: format!("{}.0", n),
            value: n as f64,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Nearest `f64`; the digits in `as_str` stay exact.
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Value carried by a constant node.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(Decimal),
}

impl Literal {
    pub fn datatype(&self) -> DataType {
        match self {
            Literal::Int(_) => DataType::Int,
            Literal::Float(_) => DataType::Float,
        }
    }

    pub fn widen(&self) -> Literal {
        match self {
            Literal::Int(n) => Literal::Float(Decimal::from_int(*n)),
            float => float.clone(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(decimal) => write!(f, "{}", decimal),
        }
    }
}
