//! Capability layer: compile-time facts about operand types
//!
//! Every operand carries a [`Category`] tag. The tags form a closed set of nine
//! concrete categories plus the [`Invalid`] sentinel:
//!
//! | tag                       | shape       | transposed                |
//! |---------------------------|-------------|---------------------------|
//! | `DenseRowMajorMatrix`     | matrix      | `DenseColumnMajorMatrix`  |
//! | `DenseColumnMajorMatrix`  | matrix      | `DenseRowMajorMatrix`     |
//! | `SparseRowMajorMatrix`    | matrix      | `SparseColumnMajorMatrix` |
//! | `SparseColumnMajorMatrix` | matrix      | `SparseRowMajorMatrix`    |
//! | `DenseColumnVector`       | column      | `DenseRowVector`          |
//! | `DenseRowVector`          | row         | `DenseColumnVector`       |
//! | `SparseColumnVector`      | column      | `SparseRowVector`         |
//! | `SparseRowVector`         | row         | `SparseColumnVector`      |
//! | `Scalar`                  | scalar      | `Scalar`                  |
//!
//! The `const fn` predicates below read those tags; [`CategoryKind::capabilities`]
//! exposes the same facts at run time.

use crate::traits::{Matrix, Operand, Vector};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Statically known dimension; `None` when only known at run time
pub type Dim = Option<usize>;

/// Two dimensions are compatible when either is dynamic or both are equal
pub const fn dims_conform(a: Dim, b: Dim) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => x == y,
        _ => true,
    }
}

/// The statically known one of two conforming dimensions
pub const fn merge_dims(a: Dim, b: Dim) -> Dim {
    match a {
        Some(_) => a,
        None => b,
    }
}

/// Storage order of a matrix, as a value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Order {
    RowMajor,
    ColumnMajor,
}

/// Orientation of a vector, as a value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orient {
    Column,
    Row,
}

/// Storage order marker types
pub trait StorageOrder: Copy + Default + Debug + Send + Sync + 'static {
    const IS_ROW_MAJOR: bool;
    const ORDER: Order;
    type Opposite: StorageOrder;
    type DenseTag: MatrixCategory;
    type SparseTag: MatrixCategory;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowMajor;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnMajor;

impl StorageOrder for RowMajor {
    const IS_ROW_MAJOR: bool = true;
    const ORDER: Order = Order::RowMajor;
    type Opposite = ColumnMajor;
    type DenseTag = DenseRowMajorMatrix;
    type SparseTag = SparseRowMajorMatrix;
}

impl StorageOrder for ColumnMajor {
    const IS_ROW_MAJOR: bool = false;
    const ORDER: Order = Order::ColumnMajor;
    type Opposite = RowMajor;
    type DenseTag = DenseColumnMajorMatrix;
    type SparseTag = SparseColumnMajorMatrix;
}

/// Vector orientation marker types
pub trait Orientation: Copy + Default + Debug + Send + Sync + 'static {
    /// Row vectors are the transposed orientation
    const IS_ROW: bool;
    const ORIENT: Orient;
    type Transposed: Orientation;
    type DenseTag: VectorCategory;
    type SparseTag: VectorCategory;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnVector;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowVector;

impl Orientation for ColumnVector {
    const IS_ROW: bool = false;
    const ORIENT: Orient = Orient::Column;
    type Transposed = RowVector;
    type DenseTag = DenseColumnVector;
    type SparseTag = SparseColumnVector;
}

impl Orientation for RowVector {
    const IS_ROW: bool = true;
    const ORIENT: Orient = Orient::Row;
    type Transposed = ColumnVector;
    type DenseTag = DenseRowVector;
    type SparseTag = SparseRowVector;
}

/// Operand category, fixed per type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryKind {
    DenseMatrix(Order),
    SparseMatrix(Order),
    DenseVector(Orient),
    SparseVector(Orient),
    Scalar,
    Invalid,
}

bitflags! {
    /// Run-time view of an operand's capabilities
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u16 {
        const MATRIX = 1 << 0;
        const VECTOR = 1 << 1;
        const SCALAR = 1 << 2;
        const DENSE = 1 << 3;
        const SPARSE = 1 << 4;
        const ROW_MAJOR = 1 << 5;
        const TRANSPOSE_VECTOR = 1 << 6;
        /// A proxy rather than a container
        const EXPRESSION = 1 << 7;
        /// A proxy that performs arithmetic when read
        const COMPUTATION = 1 << 8;
    }
}

impl CategoryKind {
    pub const fn is_matrix(self) -> bool {
        matches!(self, CategoryKind::DenseMatrix(_) | CategoryKind::SparseMatrix(_))
    }

    pub const fn is_vector(self) -> bool {
        matches!(self, CategoryKind::DenseVector(_) | CategoryKind::SparseVector(_))
    }

    pub const fn is_scalar(self) -> bool {
        matches!(self, CategoryKind::Scalar)
    }

    pub const fn is_dense(self) -> bool {
        matches!(self, CategoryKind::DenseMatrix(_) | CategoryKind::DenseVector(_))
    }

    pub const fn is_sparse(self) -> bool {
        matches!(self, CategoryKind::SparseMatrix(_) | CategoryKind::SparseVector(_))
    }

    pub const fn is_row_major(self) -> bool {
        matches!(
            self,
            CategoryKind::DenseMatrix(Order::RowMajor) | CategoryKind::SparseMatrix(Order::RowMajor)
        )
    }

    pub const fn is_transpose_vector(self) -> bool {
        matches!(
            self,
            CategoryKind::DenseVector(Orient::Row) | CategoryKind::SparseVector(Orient::Row)
        )
    }

    pub const fn is_invalid(self) -> bool {
        matches!(self, CategoryKind::Invalid)
    }

    pub fn capabilities(self) -> Capabilities {
        let mut caps = Capabilities::empty();
        caps.set(Capabilities::MATRIX, self.is_matrix());
        caps.set(Capabilities::VECTOR, self.is_vector());
        caps.set(Capabilities::SCALAR, self.is_scalar());
        caps.set(Capabilities::DENSE, self.is_dense());
        caps.set(Capabilities::SPARSE, self.is_sparse());
        caps.set(Capabilities::ROW_MAJOR, self.is_row_major());
        caps.set(Capabilities::TRANSPOSE_VECTOR, self.is_transpose_vector());
        caps
    }
}

/// Category tag types
pub trait Category: 'static {
    const KIND: CategoryKind;

    /// Coarse shape used to pick an operator implementation
    type Shape;

    /// Category of the transposed operand
    type Transposed: Category;
}

pub trait MatrixCategory: Category {
    type Order: StorageOrder;
    const IS_DENSE: bool;
}

pub trait VectorCategory: Category {
    type Orient: Orientation;
    const IS_DENSE: bool;
}

/// Shape of every matrix category
pub enum MatrixShape {}
/// Shape of column vector categories
pub enum ColumnShape {}
/// Shape of row vector categories
pub enum RowShape {}
/// Shape of the scalar category
pub enum ScalarShape {}
/// Shape of [`Invalid`]; no operator accepts it
pub enum InvalidShape {}

macro_rules! matrix_tags {
    ($($name:ident: $order:ident, $dense:literal, $kind:ident, $trans:ident;)*) => {$(
        pub enum $name {}

        impl Category for $name {
            const KIND: CategoryKind = CategoryKind::$kind(Order::$order);
            type Shape = MatrixShape;
            type Transposed = $trans;
        }

        impl MatrixCategory for $name {
            type Order = $order;
            const IS_DENSE: bool = $dense;
        }
    )*};
}

macro_rules! vector_tags {
    ($($name:ident: $orient:ident, $variant:ident, $shape:ident, $dense:literal, $kind:ident, $trans:ident;)*) => {$(
        pub enum $name {}

        impl Category for $name {
            const KIND: CategoryKind = CategoryKind::$kind(Orient::$variant);
            type Shape = $shape;
            type Transposed = $trans;
        }

        impl VectorCategory for $name {
            type Orient = $orient;
            const IS_DENSE: bool = $dense;
        }
    )*};
}

matrix_tags! {
    DenseRowMajorMatrix: RowMajor, true, DenseMatrix, DenseColumnMajorMatrix;
    DenseColumnMajorMatrix: ColumnMajor, true, DenseMatrix, DenseRowMajorMatrix;
    SparseRowMajorMatrix: RowMajor, false, SparseMatrix, SparseColumnMajorMatrix;
    SparseColumnMajorMatrix: ColumnMajor, false, SparseMatrix, SparseRowMajorMatrix;
}

vector_tags! {
    DenseColumnVector: ColumnVector, Column, ColumnShape, true, DenseVector, DenseRowVector;
    DenseRowVector: RowVector, Row, RowShape, true, DenseVector, DenseColumnVector;
    SparseColumnVector: ColumnVector, Column, ColumnShape, false, SparseVector, SparseRowVector;
    SparseRowVector: RowVector, Row, RowShape, false, SparseVector, SparseColumnVector;
}

/// Category of scalars
pub enum Scalar {}

impl Category for Scalar {
    const KIND: CategoryKind = CategoryKind::Scalar;
    type Shape = ScalarShape;
    type Transposed = Scalar;
}

/// Result of an operation that has no meaning (for example matrix times row vector).
///
/// Uninhabited: a value of this type can never exist, and no operator or
/// container trait is implemented for it.
#[derive(Debug)]
pub enum Invalid {}

impl Category for Invalid {
    const KIND: CategoryKind = CategoryKind::Invalid;
    type Shape = InvalidShape;
    type Transposed = Invalid;
}

/// Category kind of an operand type
pub const fn category_of<T: Operand + ?Sized>() -> CategoryKind {
    <<T as Operand>::Category as Category>::KIND
}

pub const fn is_matrix<T: Operand + ?Sized>() -> bool {
    category_of::<T>().is_matrix()
}

pub const fn is_vector<T: Operand + ?Sized>() -> bool {
    category_of::<T>().is_vector()
}

pub const fn is_scalar<T: Operand + ?Sized>() -> bool {
    category_of::<T>().is_scalar()
}

pub const fn is_dense<T: Operand + ?Sized>() -> bool {
    category_of::<T>().is_dense()
}

pub const fn is_sparse<T: Operand + ?Sized>() -> bool {
    category_of::<T>().is_sparse()
}

pub const fn is_row_major<T: Operand + ?Sized>() -> bool {
    category_of::<T>().is_row_major()
}

pub const fn is_transpose_vector<T: Operand + ?Sized>() -> bool {
    category_of::<T>().is_transpose_vector()
}

pub const fn is_expression<T: Operand + ?Sized>() -> bool {
    T::IS_EXPRESSION
}

pub const fn rows_of<M: Matrix + ?Sized>() -> Dim {
    M::ROWS
}

pub const fn columns_of<M: Matrix + ?Sized>() -> Dim {
    M::COLUMNS
}

pub const fn length_of<V: Vector + ?Sized>() -> Dim {
    V::SIZE
}

/// Run-time capability set of an operand type, including expression flags
pub fn capabilities<T: Operand + ?Sized>() -> Capabilities {
    let mut caps = category_of::<T>().capabilities();
    caps.set(Capabilities::EXPRESSION, T::IS_EXPRESSION);
    caps.set(Capabilities::COMPUTATION, T::IS_COMPUTATION);
    caps
}
