use crate::imports::*;

/*
    Types:
    * ArrayData - Backing storage, one Vec per element kind
    * DataArray - Typed buffer with a tuple shape and a component count
    * ArrayVisitor / ArrayVisitorMut - Generic operations over the concrete element slice
*/
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Int8(Vec<i8>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Bool(Vec<bool>),
}

pub trait ArrayVisitor {
    type Output;
    fn visit<T: Element>(self, values: &[T]) -> Self::Output;
}

pub trait ArrayVisitorMut {
    type Output;
    fn visit<T: Element>(self, values: &mut Vec<T>) -> Self::Output;
}

impl ArrayData {
    pub fn zeroed(ty: NumericType, len: usize) -> Self {
        struct Zeroed(usize);
        impl NumericVisitor for Zeroed {
            type Output = ArrayData;
            fn visit<T: Element>(self) -> ArrayData {
                T::wrap(vec![T::default(); self.0])
            }
        }
        ty.dispatch(Zeroed(len))
    }

    pub fn numeric_type(&self) -> NumericType {
        match self {
            ArrayData::Int8(_) => NumericType::Int8,
            ArrayData::UInt8(_) => NumericType::UInt8,
            ArrayData::Int16(_) => NumericType::Int16,
            ArrayData::UInt16(_) => NumericType::UInt16,
            ArrayData::Int32(_) => NumericType::Int32,
            ArrayData::UInt32(_) => NumericType::UInt32,
            ArrayData::Int64(_) => NumericType::Int64,
            ArrayData::UInt64(_) => NumericType::UInt64,
            ArrayData::Float32(_) => NumericType::Float32,
            ArrayData::Float64(_) => NumericType::Float64,
            ArrayData::Bool(_) => NumericType::Bool,
        }
    }

    pub fn len(&self) -> usize {
        struct Len;
        impl ArrayVisitor for Len {
            type Output = usize;
            fn visit<T: Element>(self, values: &[T]) -> usize {
                values.len()
            }
        }
        self.visit(Len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn visit<V: ArrayVisitor>(&self, visitor: V) -> V::Output {
        match self {
            ArrayData::Int8(v) => visitor.visit(v),
            ArrayData::UInt8(v) => visitor.visit(v),
            ArrayData::Int16(v) => visitor.visit(v),
            ArrayData::UInt16(v) => visitor.visit(v),
            ArrayData::Int32(v) => visitor.visit(v),
            ArrayData::UInt32(v) => visitor.visit(v),
            ArrayData::Int64(v) => visitor.visit(v),
            ArrayData::UInt64(v) => visitor.visit(v),
            ArrayData::Float32(v) => visitor.visit(v),
            ArrayData::Float64(v) => visitor.visit(v),
            ArrayData::Bool(v) => visitor.visit(v),
        }
    }

    pub fn visit_mut<V: ArrayVisitorMut>(&mut self, visitor: V) -> V::Output {
        match self {
            ArrayData::Int8(v) => visitor.visit(v),
            ArrayData::UInt8(v) => visitor.visit(v),
            ArrayData::Int16(v) => visitor.visit(v),
            ArrayData::UInt16(v) => visitor.visit(v),
            ArrayData::Int32(v) => visitor.visit(v),
            ArrayData::UInt32(v) => visitor.visit(v),
            ArrayData::Int64(v) => visitor.visit(v),
            ArrayData::UInt64(v) => visitor.visit(v),
            ArrayData::Float32(v) => visitor.visit(v),
            ArrayData::Float64(v) => visitor.visit(v),
            ArrayData::Bool(v) => visitor.visit(v),
        }
    }

    /// Formats element `index` as text, `None` if out of range.
    pub fn format_at(&self, index: usize) -> Option<String> {
        struct FormatAt(usize);
        impl ArrayVisitor for FormatAt {
            type Output = Option<String>;
            fn visit<T: Element>(self, values: &[T]) -> Option<String> {
                values.get(self.0).map(|v| v.format_text())
            }
        }
        self.visit(FormatAt(index))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    tuple_shape: Vec<usize>,
    components: usize,
    data: ArrayData,
}

impl DataArray {
    /// Zero-filled array of `product(tuple_shape) * components` elements.
    pub fn new(
        ty: NumericType,
        tuple_shape: Vec<usize>,
        components: usize,
    ) -> std::result::Result<Self, StoreError> {
        let len = checked_len(ty, &tuple_shape, components)?;
        Ok(DataArray {
            tuple_shape,
            components,
            data: ArrayData::zeroed(ty, len),
        })
    }

    pub fn from_vec<T: Element>(
        values: Vec<T>,
        tuple_shape: Vec<usize>,
        components: usize,
    ) -> std::result::Result<Self, StoreError> {
        let expected = checked_len(T::TYPE, &tuple_shape, components)?;
        if values.len() != expected {
            return Err(StoreError::ShapeMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(DataArray {
            tuple_shape,
            components,
            data: T::wrap(values),
        })
    }

    pub fn numeric_type(&self) -> NumericType {
        self.data.numeric_type()
    }

    pub fn tuple_shape(&self) -> &[usize] {
        &self.tuple_shape
    }

    pub fn components(&self) -> usize {
        self.components
    }

    pub fn tuple_count(&self) -> usize {
        self.tuple_shape.iter().product()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    /// Element storage for callers that mutate contents in place. Length is fixed here;
    /// shape changes go through [`DataArray::resize`].
    pub fn data_mut(&mut self) -> ArrayDataMut<'_> {
        ArrayDataMut(&mut self.data)
    }

    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::slice(&self.data)
    }

    pub fn as_mut_slice<T: Element>(&mut self) -> Option<&mut [T]> {
        T::slice_mut(&mut self.data)
    }

    /// Components of tuple `index`.
    pub fn tuple<T: Element>(&self, index: usize) -> Option<&[T]> {
        let values = self.as_slice::<T>()?;
        let start = index.checked_mul(self.components)?;
        values.get(start..start + self.components)
    }

    /// Reshapes to `tuple_shape`, truncating or zero-padding the element buffer. The array is
    /// unchanged when the new shape is too large to allocate.
    pub fn resize(&mut self, tuple_shape: Vec<usize>) -> std::result::Result<(), StoreError> {
        struct Resize(usize);
        impl ArrayVisitorMut for Resize {
            type Output = ();
            fn visit<T: Element>(self, values: &mut Vec<T>) {
                values.resize(self.0, T::default());
            }
        }
        let len = checked_len(self.numeric_type(), &tuple_shape, self.components)?;
        self.data.visit_mut(Resize(len));
        self.tuple_shape = tuple_shape;
        Ok(())
    }

    /// Parses `text` once as this array's element type and writes it everywhere.
    pub fn fill(&mut self, text: &str) -> std::result::Result<(), NumericError> {
        struct Fill<'a>(&'a str);
        impl ArrayVisitorMut for Fill<'_> {
            type Output = std::result::Result<(), NumericError>;
            fn visit<T: Element>(self, values: &mut Vec<T>) -> Self::Output {
                let value = T::parse_text(self.0)?;
                values.iter_mut().for_each(|v| *v = value);
                Ok(())
            }
        }
        self.data.visit_mut(Fill(text))
    }
}

/// Mutable view over array elements that cannot change the buffer length.
pub struct ArrayDataMut<'a>(&'a mut ArrayData);

impl ArrayDataMut<'_> {
    pub fn numeric_type(&self) -> NumericType {
        self.0.numeric_type()
    }

    pub fn visit<V: SliceVisitorMut>(self, visitor: V) -> V::Output {
        struct Adapter<V>(V);
        impl<V: SliceVisitorMut> ArrayVisitorMut for Adapter<V> {
            type Output = V::Output;
            fn visit<T: Element>(self, values: &mut Vec<T>) -> Self::Output {
                self.0.visit(values.as_mut_slice())
            }
        }
        self.0.visit_mut(Adapter(visitor))
    }
}

pub trait SliceVisitorMut {
    type Output;
    fn visit<T: Element>(self, values: &mut [T]) -> Self::Output;
}

/// `product(tuple_shape) * components`, `None` on overflow.
pub fn element_count(tuple_shape: &[usize], components: usize) -> Option<usize> {
    tuple_shape
        .iter()
        .try_fold(components, |count, extent| count.checked_mul(*extent))
}

/// Element count of a `ty` buffer with this shape, rejected when its byte size cannot be allocated.
pub fn checked_len(
    ty: NumericType,
    tuple_shape: &[usize],
    components: usize,
) -> std::result::Result<usize, StoreError> {
    let too_large = || StoreError::ArrayTooLarge {
        tuple_shape: tuple_shape.to_vec(),
        components,
    };
    let len = element_count(tuple_shape, components).ok_or_else(too_large)?;
    match len.checked_mul(ty.size_of()) {
        Some(bytes) if bytes <= isize::MAX as usize => Ok(len),
        _ => Err(too_large()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_array_is_zero_filled_with_declared_length() {
        let array = DataArray::new(NumericType::Int32, vec![2, 3], 4).unwrap();
        assert_eq!(array.len(), 24);
        assert_eq!(array.tuple_count(), 6);
        assert!(array.as_slice::<i32>().unwrap().iter().all(|v| *v == 0));
        assert!(array.as_slice::<f32>().is_none());
    }

    #[test]
    fn from_vec_checks_shape() {
        let err = DataArray::from_vec(vec![1u8, 2, 3], vec![2], 2).unwrap_err();
        assert!(matches!(
            err,
            StoreError::ShapeMismatch {
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn resize_preserves_length_invariant() {
        let mut array = DataArray::from_vec(vec![1.0f64, 2.0, 3.0, 4.0], vec![2], 2).unwrap();
        array.resize(vec![3]).unwrap();
        assert_eq!(array.len(), 6);
        assert_eq!(array.as_slice::<f64>().unwrap(), &[1.0, 2.0, 3.0, 4.0, 0.0, 0.0]);
        array.resize(vec![1]).unwrap();
        assert_eq!(array.as_slice::<f64>().unwrap(), &[1.0, 2.0]);
        assert_eq!(array.tuple_shape(), &[1]);
    }

    #[test]
    fn oversized_shapes_are_rejected_before_allocating() {
        assert_eq!(element_count(&[usize::MAX / 2, 4], 1), None);
        assert_eq!(element_count(&[3, 4], 2), Some(24));
        assert!(matches!(
            DataArray::new(NumericType::Float32, vec![usize::MAX / 2, 4], 1),
            Err(StoreError::ArrayTooLarge { .. })
        ));
        assert!(matches!(
            DataArray::new(NumericType::Int64, vec![1 << 62], 1),
            Err(StoreError::ArrayTooLarge { .. })
        ));
        assert!(checked_len(NumericType::UInt8, &[1 << 20], 1).is_ok());

        let mut array = DataArray::from_vec(vec![1i16, 2], vec![2], 1).unwrap();
        assert!(array.resize(vec![usize::MAX, 2]).is_err());
        assert_eq!(array.tuple_shape(), &[2]);
        assert_eq!(array.as_slice::<i16>().unwrap(), &[1, 2]);
    }

    #[test]
    fn fill_parses_once_per_type() {
        let mut array = DataArray::new(NumericType::UInt16, vec![5], 1).unwrap();
        array.fill("7").unwrap();
        assert_eq!(array.as_slice::<u16>().unwrap(), &[7; 5]);
        assert!(array.fill("-1").is_err());
        assert_eq!(array.as_slice::<u16>().unwrap(), &[7; 5]);
    }

    #[test]
    fn tuple_returns_component_slice() {
        let array = DataArray::from_vec(vec![1i64, 2, 3, 4, 5, 6], vec![3], 2).unwrap();
        assert_eq!(array.tuple::<i64>(1).unwrap(), &[3, 4]);
        assert!(array.tuple::<i64>(3).is_none());
    }

    #[test]
    fn format_at_uses_element_text() {
        let array = DataArray::from_vec(vec![true, false], vec![2], 1).unwrap();
        assert_eq!(array.data().format_at(0).as_deref(), Some("true"));
        assert_eq!(array.data().format_at(2), None);
    }
}
