//! Typed properties and the mapping between Rust types and variants.

use std::fmt;
use std::marker::PhantomData;

use crate::address_space::{AddressSpace, NodeClass};
use crate::error::ProjectionError;
use crate::id::NodeId;
use crate::variant::{ArrayValue, DataType, EuInformation, Range, ValueRank, Variant};

use super::{Shape, expect_node};

/// A Rust type that a variable can be narrowed to.
pub trait SlotValue: Sized {
    const DATA_TYPE: DataType;
    const VALUE_RANK: ValueRank;

    /// Wrap the value in a variant carrying [`Self::DATA_TYPE`].
    fn into_variant(self) -> Variant;

    /// Extract the value when the variant has the matching tag and rank.
    fn from_variant(variant: &Variant) -> Option<Self>;
}

impl SlotValue for bool {
    const DATA_TYPE: DataType = DataType::Boolean;
    const VALUE_RANK: ValueRank = ValueRank::Scalar;

    fn into_variant(self) -> Variant {
        Variant::Boolean(self)
    }

    fn from_variant(variant: &Variant) -> Option<Self> {
        match variant {
            Variant::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

impl SlotValue for f64 {
    const DATA_TYPE: DataType = DataType::Double;
    const VALUE_RANK: ValueRank = ValueRank::Scalar;

    fn into_variant(self) -> Variant {
        Variant::Double(self)
    }

    fn from_variant(variant: &Variant) -> Option<Self> {
        match variant {
            Variant::Double(v) => Some(*v),
            _ => None,
        }
    }
}

impl SlotValue for String {
    const DATA_TYPE: DataType = DataType::String;
    const VALUE_RANK: ValueRank = ValueRank::Scalar;

    fn into_variant(self) -> Variant {
        Variant::String(self)
    }

    fn from_variant(variant: &Variant) -> Option<Self> {
        match variant {
            Variant::String(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl SlotValue for Vec<f64> {
    const DATA_TYPE: DataType = DataType::Double;
    const VALUE_RANK: ValueRank = ValueRank::OneDimension;

    fn into_variant(self) -> Variant {
        Variant::Array(ArrayValue::Double(self))
    }

    fn from_variant(variant: &Variant) -> Option<Self> {
        match variant {
            Variant::Array(ArrayValue::Double(v)) => Some(v.clone()),
            _ => None,
        }
    }
}

impl SlotValue for EuInformation {
    const DATA_TYPE: DataType = DataType::EuInformation;
    const VALUE_RANK: ValueRank = ValueRank::Scalar;

    fn into_variant(self) -> Variant {
        Variant::EuInformation(self)
    }

    fn from_variant(variant: &Variant) -> Option<Self> {
        match variant {
            Variant::EuInformation(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl SlotValue for Range {
    const DATA_TYPE: DataType = DataType::Range;
    const VALUE_RANK: ValueRank = ValueRank::Scalar;

    fn into_variant(self) -> Variant {
        Variant::Range(self)
    }

    fn from_variant(variant: &Variant) -> Option<Self> {
        match variant {
            Variant::Range(v) => Some(*v),
            _ => None,
        }
    }
}

/// Check that `node` is a variable declared as `T`.
pub(crate) fn expect_variable_of<T: SlotValue>(
    space: &AddressSpace,
    node: NodeId,
) -> Result<(), ProjectionError> {
    let found = expect_node(space, node, NodeClass::Variable)?;
    // expect_node guarantees a variable body
    let Some(attrs) = found.as_variable() else {
        return Err(ProjectionError::WrongNodeClass {
            node,
            expected: "a variable",
        });
    };
    if attrs.data_type != T::DATA_TYPE || attrs.value_rank != T::VALUE_RANK {
        return Err(ProjectionError::WrongDataType {
            node,
            expected: T::DATA_TYPE,
            expected_rank: T::VALUE_RANK,
            actual: attrs.data_type,
            actual_rank: attrs.value_rank,
        });
    }
    Ok(())
}

/// A variable narrowed to the Rust type `T`.
pub struct Property<T> {
    node: NodeId,
    _value: PhantomData<fn() -> T>,
}

impl<T> Property<T> {
    /// Read the current value, `None` while the variable holds nothing of type `T`.
    #[must_use]
    pub fn get(&self, space: &AddressSpace) -> Option<T>
    where
        T: SlotValue,
    {
        space
            .value(self.node)
            .and_then(|dv| T::from_variant(&dv.value))
    }
}

impl<T: SlotValue> Shape for Property<T> {
    fn project(space: &AddressSpace, node: NodeId) -> Result<Self, ProjectionError> {
        expect_variable_of::<T>(space, node)?;
        Ok(Self {
            node,
            _value: PhantomData,
        })
    }

    fn node_id(&self) -> NodeId {
        self.node
    }
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Property<T> {}

impl<T> PartialEq for Property<T> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<T> Eq for Property<T> {}

impl<T> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Property").field(&self.node).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address_space::{QualifiedName, VariableAttributes};
    use crate::variant::DataValue;

    fn space_with_flag() -> (AddressSpace, NodeId) {
        let mut space = AddressSpace::new();
        let flag = space
            .add_property(
                space.objects_folder(),
                QualifiedName::new(0, "IsEnabled"),
                VariableAttributes::scalar(DataType::Boolean)
                    .with_value(DataValue::constant(true)),
            )
            .unwrap();
        (space, flag)
    }

    #[test]
    fn should_project_property_of_matching_type() {
        let (space, flag) = space_with_flag();
        let property: Property<bool> = Property::project(&space, flag).unwrap();
        assert_eq!(property.get(&space), Some(true));
    }

    #[test]
    fn should_reject_property_of_other_type() {
        let (space, flag) = space_with_flag();
        let err = Property::<f64>::project(&space, flag).unwrap_err();
        assert!(matches!(
            err,
            ProjectionError::WrongDataType {
                expected: DataType::Double,
                actual: DataType::Boolean,
                ..
            }
        ));
    }

    #[test]
    fn should_reject_object_as_property() {
        let space = AddressSpace::new();
        let err = Property::<bool>::project(&space, space.objects_folder()).unwrap_err();
        assert!(matches!(err, ProjectionError::WrongNodeClass { .. }));
    }

    #[test]
    fn should_map_double_array_to_one_dimension() {
        assert_eq!(<Vec<f64> as SlotValue>::VALUE_RANK, ValueRank::OneDimension);
        let variant = vec![1.0, 4.0].into_variant();
        assert_eq!(Vec::<f64>::from_variant(&variant), Some(vec![1.0, 4.0]));
        assert_eq!(f64::from_variant(&variant), None);
    }
}
