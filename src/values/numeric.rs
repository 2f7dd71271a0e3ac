use crate::imports::*;

/*
    Types:
    * NumericType - Closed set of element kinds a DataArray can hold
    * Element - Implemented once per Rust scalar backing a NumericType
    * NumericVisitor - Generic operation invoked with the concrete Element for a runtime tag
    * ArithmeticOp - Scalar operations available on numeric element kinds
    * NumericError - Tag and text parsing failures
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    Bool,
}

pub const ALL_NUMERIC_TYPES: [NumericType; 11] = [
    NumericType::Int8,
    NumericType::UInt8,
    NumericType::Int16,
    NumericType::UInt16,
    NumericType::Int32,
    NumericType::UInt32,
    NumericType::Int64,
    NumericType::UInt64,
    NumericType::Float32,
    NumericType::Float64,
    NumericType::Bool,
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NumericError {
    #[error("unsupported numeric type '{0}'")]
    UnsupportedType(String),
    #[error("'{text}' is not a valid {ty} value: {reason}")]
    Parse {
        text: String,
        ty: NumericType,
        reason: String,
    },
    #[error("operation '{op}' is not supported for {ty} elements")]
    UnsupportedOperation { op: ArithmeticOp, ty: NumericType },
}

impl NumericType {
    pub fn name(&self) -> &'static str {
        match self {
            NumericType::Int8 => "int8",
            NumericType::UInt8 => "uint8",
            NumericType::Int16 => "int16",
            NumericType::UInt16 => "uint16",
            NumericType::Int32 => "int32",
            NumericType::UInt32 => "uint32",
            NumericType::Int64 => "int64",
            NumericType::UInt64 => "uint64",
            NumericType::Float32 => "float32",
            NumericType::Float64 => "float64",
            NumericType::Bool => "bool",
        }
    }

    pub fn from_name(name: &str) -> std::result::Result<Self, NumericError> {
        ALL_NUMERIC_TYPES
            .iter()
            .copied()
            .find(|ty| ty.name() == name)
            .ok_or_else(|| NumericError::UnsupportedType(name.to_string()))
    }

    pub fn size_of(&self) -> usize {
        self.dispatch(SizeOf)
    }

    pub fn is_integer(&self) -> bool {
        !matches!(
            self,
            NumericType::Float32 | NumericType::Float64 | NumericType::Bool
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, NumericType::Float32 | NumericType::Float64)
    }

    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            NumericType::Int8
                | NumericType::Int16
                | NumericType::Int32
                | NumericType::Int64
                | NumericType::Float32
                | NumericType::Float64
        )
    }

    /// Invokes `visitor` with the Rust scalar that backs this tag.
    pub fn dispatch<V: NumericVisitor>(self, visitor: V) -> V::Output {
        match self {
            NumericType::Int8 => visitor.visit::<i8>(),
            NumericType::UInt8 => visitor.visit::<u8>(),
            NumericType::Int16 => visitor.visit::<i16>(),
            NumericType::UInt16 => visitor.visit::<u16>(),
            NumericType::Int32 => visitor.visit::<i32>(),
            NumericType::UInt32 => visitor.visit::<u32>(),
            NumericType::Int64 => visitor.visit::<i64>(),
            NumericType::UInt64 => visitor.visit::<u64>(),
            NumericType::Float32 => visitor.visit::<f32>(),
            NumericType::Float64 => visitor.visit::<f64>(),
            NumericType::Bool => visitor.visit::<bool>(),
        }
    }

    /// Checks that `text` parses as this type without keeping the value.
    pub fn validate_text(self, text: &str) -> std::result::Result<(), NumericError> {
        struct Validate<'a>(&'a str);
        impl NumericVisitor for Validate<'_> {
            type Output = std::result::Result<(), NumericError>;
            fn visit<T: Element>(self) -> Self::Output {
                T::parse_text(self.0).map(|_| ())
            }
        }
        self.dispatch(Validate(text))
    }
}

impl std::fmt::Display for NumericType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for NumericType {
    type Err = NumericError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        NumericType::from_name(s)
    }
}

pub trait NumericVisitor {
    type Output;
    fn visit<T: Element>(self) -> Self::Output;
}

struct SizeOf;

impl NumericVisitor for SizeOf {
    type Output = usize;
    fn visit<T: Element>(self) -> usize {
        std::mem::size_of::<T>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Min,
    Max,
}

pub const ARITHMETIC_OP_NAMES: &[&str] = &["add", "subtract", "multiply", "divide", "min", "max"];

impl ArithmeticOp {
    pub fn name(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "add",
            ArithmeticOp::Subtract => "subtract",
            ArithmeticOp::Multiply => "multiply",
            ArithmeticOp::Divide => "divide",
            ArithmeticOp::Min => "min",
            ArithmeticOp::Max => "max",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "add" => Some(ArithmeticOp::Add),
            "subtract" => Some(ArithmeticOp::Subtract),
            "multiply" => Some(ArithmeticOp::Multiply),
            "divide" => Some(ArithmeticOp::Divide),
            "min" => Some(ArithmeticOp::Min),
            "max" => Some(ArithmeticOp::Max),
            _ => None,
        }
    }
}

impl std::fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A scalar that can live in a DataArray.
pub trait Element:
    Copy + Default + PartialEq + PartialOrd + std::fmt::Debug + Send + Sync + 'static
{
    const TYPE: NumericType;

    fn parse_text(text: &str) -> std::result::Result<Self, NumericError>;
    fn format_text(self) -> String;
    fn is_zero(self) -> bool;

    /// `None` when the operation has no meaning for this element kind.
    fn combine(self, op: ArithmeticOp, rhs: Self) -> Option<Self>;

    fn wrap(values: Vec<Self>) -> ArrayData;
    fn slice(data: &ArrayData) -> Option<&[Self]>;
    fn slice_mut(data: &mut ArrayData) -> Option<&mut [Self]>;
}

macro_rules! impl_integer_element {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl Element for $ty {
                const TYPE: NumericType = NumericType::$variant;

                fn parse_text(text: &str) -> std::result::Result<Self, NumericError> {
                    text.trim().parse::<$ty>().map_err(|e| NumericError::Parse {
                        text: text.to_string(),
                        ty: Self::TYPE,
                        reason: e.to_string(),
                    })
                }

                fn format_text(self) -> String {
                    self.to_string()
                }

                fn is_zero(self) -> bool {
                    self == 0
                }

                fn combine(self, op: ArithmeticOp, rhs: Self) -> Option<Self> {
                    match op {
                        ArithmeticOp::Add => Some(self.saturating_add(rhs)),
                        ArithmeticOp::Subtract => Some(self.saturating_sub(rhs)),
                        ArithmeticOp::Multiply => Some(self.saturating_mul(rhs)),
                        ArithmeticOp::Divide => (rhs != 0).then(|| self.saturating_div(rhs)),
                        ArithmeticOp::Min => Some(std::cmp::min(self, rhs)),
                        ArithmeticOp::Max => Some(std::cmp::max(self, rhs)),
                    }
                }

                fn wrap(values: Vec<Self>) -> ArrayData {
                    ArrayData::$variant(values)
                }

                fn slice(data: &ArrayData) -> Option<&[Self]> {
                    match data {
                        ArrayData::$variant(values) => Some(values),
                        _ => None,
                    }
                }

                fn slice_mut(data: &mut ArrayData) -> Option<&mut [Self]> {
                    match data {
                        ArrayData::$variant(values) => Some(values),
                        _ => None,
                    }
                }
            }
        )+
    };
}

macro_rules! impl_float_element {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl Element for $ty {
                const TYPE: NumericType = NumericType::$variant;

                fn parse_text(text: &str) -> std::result::Result<Self, NumericError> {
                    text.trim().parse::<$ty>().map_err(|e| NumericError::Parse {
                        text: text.to_string(),
                        ty: Self::TYPE,
                        reason: e.to_string(),
                    })
                }

                // Display for floats is the shortest text that parses back to the same value.
                fn format_text(self) -> String {
                    self.to_string()
                }

                fn is_zero(self) -> bool {
                    self == 0.0
                }

                fn combine(self, op: ArithmeticOp, rhs: Self) -> Option<Self> {
                    match op {
                        ArithmeticOp::Add => Some(self + rhs),
                        ArithmeticOp::Subtract => Some(self - rhs),
                        ArithmeticOp::Multiply => Some(self * rhs),
                        ArithmeticOp::Divide => Some(self / rhs),
                        ArithmeticOp::Min => Some(self.min(rhs)),
                        ArithmeticOp::Max => Some(self.max(rhs)),
                    }
                }

                fn wrap(values: Vec<Self>) -> ArrayData {
                    ArrayData::$variant(values)
                }

                fn slice(data: &ArrayData) -> Option<&[Self]> {
                    match data {
                        ArrayData::$variant(values) => Some(values),
                        _ => None,
                    }
                }

                fn slice_mut(data: &mut ArrayData) -> Option<&mut [Self]> {
                    match data {
                        ArrayData::$variant(values) => Some(values),
                        _ => None,
                    }
                }
            }
        )+
    };
}

impl_integer_element!(
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
);

impl_float_element!(f32 => Float32, f64 => Float64);

impl Element for bool {
    const TYPE: NumericType = NumericType::Bool;

    fn parse_text(text: &str) -> std::result::Result<Self, NumericError> {
        match text.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(NumericError::Parse {
                text: other.to_string(),
                ty: NumericType::Bool,
                reason: "expected true, false, 1 or 0".to_string(),
            }),
        }
    }

    fn format_text(self) -> String {
        self.to_string()
    }

    fn is_zero(self) -> bool {
        !self
    }

    fn combine(self, _op: ArithmeticOp, _rhs: Self) -> Option<Self> {
        None
    }

    fn wrap(values: Vec<Self>) -> ArrayData {
        ArrayData::Bool(values)
    }

    fn slice(data: &ArrayData) -> Option<&[Self]> {
        match data {
            ArrayData::Bool(values) => Some(values),
            _ => None,
        }
    }

    fn slice_mut(data: &mut ArrayData) -> Option<&mut [Self]> {
        match data {
            ArrayData::Bool(values) => Some(values),
            _ => None,
        }
    }
}

/// Parses `text` into the element type named by `ty` and formats it back.
///
/// Used to normalise user supplied values without picking a code path by hand.
pub fn normalize_text(ty: NumericType, text: &str) -> std::result::Result<String, NumericError> {
    struct Normalize<'a>(&'a str);
    impl NumericVisitor for Normalize<'_> {
        type Output = std::result::Result<String, NumericError>;
        fn visit<T: Element>(self) -> Self::Output {
            T::parse_text(self.0).map(Element::format_text)
        }
    }
    ty.dispatch(Normalize(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip<T: Element>(value: T) {
        let text = value.format_text();
        assert_eq!(T::parse_text(&text).unwrap(), value, "text was '{}'", text);
    }

    #[test]
    fn names_round_trip_for_every_type() {
        for ty in ALL_NUMERIC_TYPES {
            assert_eq!(NumericType::from_name(ty.name()).unwrap(), ty);
        }
    }

    #[test]
    fn unknown_type_name_is_unsupported() {
        assert_eq!(
            NumericType::from_name("complex64"),
            Err(NumericError::UnsupportedType("complex64".to_string()))
        );
    }

    #[test]
    fn boundary_values_round_trip() {
        round_trip(i8::MIN);
        round_trip(i8::MAX);
        round_trip(u8::MAX);
        round_trip(i16::MIN);
        round_trip(u16::MAX);
        round_trip(i32::MIN);
        round_trip(u32::MAX);
        round_trip(i64::MIN);
        round_trip(u64::MAX);
        round_trip(f32::MIN_POSITIVE);
        round_trip(0.1f32);
        round_trip(-1.5e30f32);
        round_trip(f64::MAX);
        round_trip(std::f64::consts::PI);
        round_trip(true);
        round_trip(false);
    }

    #[test]
    fn integer_parse_checks_width_and_sign() {
        assert!(u8::parse_text("256").is_err());
        assert!(u8::parse_text("-1").is_err());
        assert!(i8::parse_text("-129").is_err());
        assert_eq!(i8::parse_text("-128").unwrap(), -128);
        assert!(i32::parse_text("2.5").is_err());
        assert!(i32::parse_text("abc").is_err());
        assert_eq!(i32::parse_text(" 2 ").unwrap(), 2);
    }

    #[test]
    fn float_parse_failure_is_reported() {
        let err = f64::parse_text("one").unwrap_err();
        assert!(matches!(
            err,
            NumericError::Parse {
                ty: NumericType::Float64,
                ..
            }
        ));
    }

    #[test]
    fn dispatch_selects_matching_element() {
        struct TagOf;
        impl NumericVisitor for TagOf {
            type Output = NumericType;
            fn visit<T: Element>(self) -> NumericType {
                T::TYPE
            }
        }
        for ty in ALL_NUMERIC_TYPES {
            assert_eq!(ty.dispatch(TagOf), ty);
        }
        assert_eq!(NumericType::Int16.size_of(), 2);
        assert_eq!(NumericType::Float64.size_of(), 8);
    }

    #[test]
    fn integer_arithmetic_saturates() {
        assert_eq!(250u8.combine(ArithmeticOp::Add, 10), Some(255));
        assert_eq!(0u8.combine(ArithmeticOp::Subtract, 1), Some(0));
        assert_eq!(7i32.combine(ArithmeticOp::Divide, 0), None);
        assert_eq!(i32::MIN.combine(ArithmeticOp::Divide, -1), Some(i32::MAX));
        assert_eq!(i8::MIN.combine(ArithmeticOp::Multiply, -1), Some(i8::MAX));
        assert_eq!(u16::MAX.combine(ArithmeticOp::Divide, 2), Some(32767));
        assert_eq!(3i32.combine(ArithmeticOp::Max, 9), Some(9));
        assert_eq!(true.combine(ArithmeticOp::Add, true), None);
    }

    #[test]
    fn normalize_text_reformats() {
        assert_eq!(normalize_text(NumericType::Int32, " 0042 ").unwrap(), "42");
        assert_eq!(normalize_text(NumericType::Bool, "1").unwrap(), "true");
        assert!(normalize_text(NumericType::UInt16, "70000").is_err());
    }
}
