//! Operand traits shared by containers and expression nodes
//!
//! Every value that can appear in an expression is an [`Operand`]. Matrices and
//! vectors additionally expose the read interface ([`Matrix`], [`Vector`]) and
//! the assignment protocol: an expression writes itself into a dense target
//! ([`DenseMatrixMut`], [`DenseVectorMut`]) with `assign_to`, `add_assign_to` or
//! `sub_assign_to`, choosing between streaming and evaluating through its
//! operands' kernels.
//!
//! A shared reference to an operand is an operand of the same category; that is
//! how `&a * &b` forwards the categories of `a` and `b`.

use crate::expressions::stream::{stream_matrix, stream_vector, Mode};
use crate::numeric::Numeric;
use crate::resolve::ResultFor;
use crate::simd::kernels;
use crate::typetraits::{Category, Dim, Orientation, Scalar, StorageOrder};

/// Address range of some storage, used for alias detection.
///
/// Dense matrices also record how elements are laid out in the range, so two
/// regions compare equal only when they map every `(i, j)` to the same address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    start: usize,
    end: usize,
    layout: Option<Layout>,
}

/// Shape and storage order of a dense matrix
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Layout {
    pub rows: usize,
    pub columns: usize,
    pub row_major: bool,
}

impl Region {
    /// Region that overlaps nothing
    pub const EMPTY: Region = Region {
        start: 0,
        end: 0,
        layout: None,
    };

    pub fn of_slice<T>(slice: &[T]) -> Self {
        let start = slice.as_ptr() as usize;
        Region {
            start,
            end: start + std::mem::size_of_val(slice),
            layout: None,
        }
    }

    pub fn from_raw<T>(ptr: *const T, len: usize) -> Self {
        let start = ptr as usize;
        Region {
            start,
            end: start + len * std::mem::size_of::<T>(),
            layout: None,
        }
    }

    /// The same range holding a dense `rows x columns` matrix in order `SO`
    pub fn with_layout<SO: StorageOrder>(self, rows: usize, columns: usize) -> Self {
        Region {
            layout: Some(Layout {
                rows,
                columns,
                row_major: SO::IS_ROW_MAJOR,
            }),
            ..self
        }
    }

    /// The same range read as the transposed matrix
    pub fn transposed(self) -> Self {
        Region {
            layout: self.layout.map(|l| Layout {
                rows: l.columns,
                columns: l.rows,
                row_major: !l.row_major,
            }),
            ..self
        }
    }

    pub fn layout(&self) -> Option<Layout> {
        self.layout
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn overlaps(&self, other: Region) -> bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end && other.start < self.end
    }
}

/// Anything that can appear in an expression
pub trait Operand {
    type Element: Numeric;
    type Category: Category;

    /// Proxies (not containers) set this
    const IS_EXPRESSION: bool = false;

    /// Proxies that compute when read set this
    const IS_COMPUTATION: bool = false;
}

macro_rules! scalar_operand {
    ($($t:ty),*) => {$(
        impl Operand for $t {
            type Element = $t;
            type Category = Scalar;
        }
    )*};
}

scalar_operand!(f32, f64, i32, i64, u32, u64);

impl<'a, T: Operand + ?Sized> Operand for &'a T {
    type Element = T::Element;
    type Category = T::Category;
    const IS_EXPRESSION: bool = T::IS_EXPRESSION;
    const IS_COMPUTATION: bool = T::IS_COMPUTATION;
}

/// The concrete type an operand evaluates into
pub type ResultType<T> = <<T as Operand>::Category as ResultFor<<T as Operand>::Element>>::Type;

/// Read interface and assignment protocol of every matrix operand
pub trait Matrix: Operand {
    type Order: StorageOrder;

    /// Rows, when fixed by the type
    const ROWS: Dim = None;

    /// Columns, when fixed by the type
    const COLUMNS: Dim = None;

    /// Whether reading this operand element by element would be expensive (a
    /// product, or something containing one). Such operands are evaluated through
    /// their own kernels or into a temporary instead of being streamed.
    const REQUIRES_EVALUATION: bool = false;

    fn rows(&self) -> usize;
    fn columns(&self) -> usize;

    /// Element (i, j), computed on demand for expressions
    fn at(&self, i: usize, j: usize) -> Self::Element;

    /// Number of rows (row-major) or columns (column-major)
    fn major_len(&self) -> usize {
        if <Self::Order as StorageOrder>::IS_ROW_MAJOR {
            self.rows()
        } else {
            self.columns()
        }
    }

    fn minor_len(&self) -> usize {
        if <Self::Order as StorageOrder>::IS_ROW_MAJOR {
            self.columns()
        } else {
            self.rows()
        }
    }

    /// Element at position `minor` of row/column `major`
    fn at_major(&self, major: usize, minor: usize) -> Self::Element {
        if <Self::Order as StorageOrder>::IS_ROW_MAJOR {
            self.at(major, minor)
        } else {
            self.at(minor, major)
        }
    }

    /// Contiguous storage of one row (row-major) or column (column-major)
    fn major_slice(&self, _major: usize) -> Option<&[Self::Element]> {
        None
    }

    /// Visit the stored elements of one row/column as `(minor, value)`.
    ///
    /// Dense operands visit every element; sparse operands only their non-zeros.
    fn for_each_stored_in<F>(&self, major: usize, mut f: F)
    where
        F: FnMut(usize, Self::Element),
    {
        match self.major_slice(major) {
            Some(values) => {
                for (minor, &value) in values.iter().enumerate() {
                    f(minor, value);
                }
            }
            None => {
                for minor in 0..self.minor_len() {
                    f(minor, self.at_major(major, minor));
                }
            }
        }
    }

    /// Whether any storage this operand reads overlaps `region`
    fn is_aliased(&self, region: Region) -> bool;

    /// Whether assigning this operand into `region` could read data already
    /// overwritten; a `true` answer makes assignment go through a temporary
    fn can_alias(&self, region: Region) -> bool {
        self.is_aliased(region)
    }

    /// Whether this operand's own storage is exactly `region`, laid out the
    /// same way, so element `(i, j)` is read from where it is written
    fn occupies(&self, _region: Region) -> bool {
        false
    }

    /// `target = self`, shapes already checked
    fn assign_to<D>(&self, target: &mut D)
    where
        D: DenseMatrixMut<Element = Self::Element> + ?Sized,
    {
        stream_matrix(target, self, Mode::Assign);
    }

    /// `target += self`, shapes already checked
    fn add_assign_to<D>(&self, target: &mut D)
    where
        D: DenseMatrixMut<Element = Self::Element> + ?Sized,
    {
        stream_matrix(target, self, Mode::Add);
    }

    /// `target -= self`, shapes already checked
    fn sub_assign_to<D>(&self, target: &mut D)
    where
        D: DenseMatrixMut<Element = Self::Element> + ?Sized,
    {
        stream_matrix(target, self, Mode::Sub);
    }

    /// Materialize into the resolved result container
    fn eval(&self) -> ResultType<Self>
    where
        Self: Sized,
        Self::Category: ResultFor<Self::Element>,
        ResultType<Self>: FromMatrix<Self>,
    {
        <ResultType<Self> as FromMatrix<Self>>::from_matrix(self)
    }
}

/// Dense matrices that can be written element by element
pub trait DenseMatrixMut: Matrix {
    fn set(&mut self, i: usize, j: usize, value: Self::Element);

    /// Address range of the storage
    fn region(&self) -> Region;

    fn major_slice_mut(&mut self, _major: usize) -> Option<&mut [Self::Element]> {
        None
    }

    /// Set every element to zero
    fn reset(&mut self) {
        for major in 0..self.major_len() {
            if let Some(values) = self.major_slice_mut(major) {
                values.fill(num_traits::zero());
                continue;
            }
            for minor in 0..self.minor_len() {
                let (i, j) = ij::<Self::Order>(major, minor);
                self.set(i, j, num_traits::zero());
            }
        }
    }

    /// Multiply every element by `alpha`
    fn scale(&mut self, alpha: Self::Element) {
        for major in 0..self.major_len() {
            if let Some(values) = self.major_slice_mut(major) {
                kernels::scale_in_place(alpha, values);
                continue;
            }
            for minor in 0..self.minor_len() {
                let (i, j) = ij::<Self::Order>(major, minor);
                let value = self.at(i, j);
                self.set(i, j, value * alpha);
            }
        }
    }
}

/// Row and column of position `minor` in row/column `major` under order `SO`
#[inline(always)]
pub(crate) fn ij<SO: StorageOrder>(major: usize, minor: usize) -> (usize, usize) {
    if SO::IS_ROW_MAJOR {
        (major, minor)
    } else {
        (minor, major)
    }
}

/// Read interface and assignment protocol of every vector operand
pub trait Vector: Operand {
    type Orient: Orientation;

    /// Length, when fixed by the type
    const SIZE: Dim = None;

    /// See [`Matrix::REQUIRES_EVALUATION`]
    const REQUIRES_EVALUATION: bool = false;

    fn size(&self) -> usize;

    /// Element i, computed on demand for expressions
    fn at(&self, i: usize) -> Self::Element;

    /// Contiguous storage, for dense containers
    fn as_slice(&self) -> Option<&[Self::Element]> {
        None
    }

    /// Visit stored elements as `(index, value)`; only non-zeros for sparse operands
    fn for_each_stored<F>(&self, mut f: F)
    where
        F: FnMut(usize, Self::Element),
    {
        match self.as_slice() {
            Some(values) => {
                for (i, &value) in values.iter().enumerate() {
                    f(i, value);
                }
            }
            None => {
                for i in 0..self.size() {
                    f(i, self.at(i));
                }
            }
        }
    }

    fn is_aliased(&self, region: Region) -> bool;

    fn can_alias(&self, region: Region) -> bool {
        self.is_aliased(region)
    }

    fn occupies(&self, _region: Region) -> bool {
        false
    }

    fn assign_to<D>(&self, target: &mut D)
    where
        D: DenseVectorMut<Element = Self::Element> + ?Sized,
    {
        stream_vector(target, self, Mode::Assign);
    }

    fn add_assign_to<D>(&self, target: &mut D)
    where
        D: DenseVectorMut<Element = Self::Element> + ?Sized,
    {
        stream_vector(target, self, Mode::Add);
    }

    fn sub_assign_to<D>(&self, target: &mut D)
    where
        D: DenseVectorMut<Element = Self::Element> + ?Sized,
    {
        stream_vector(target, self, Mode::Sub);
    }

    /// Materialize into the resolved result container
    fn eval(&self) -> ResultType<Self>
    where
        Self: Sized,
        Self::Category: ResultFor<Self::Element>,
        ResultType<Self>: FromVector<Self>,
    {
        <ResultType<Self> as FromVector<Self>>::from_vector(self)
    }
}

/// Dense vectors that can be written element by element
pub trait DenseVectorMut: Vector {
    fn set(&mut self, i: usize, value: Self::Element);

    fn region(&self) -> Region;

    fn as_mut_slice(&mut self) -> Option<&mut [Self::Element]> {
        None
    }

    fn reset(&mut self) {
        if let Some(values) = self.as_mut_slice() {
            values.fill(num_traits::zero());
            return;
        }
        for i in 0..self.size() {
            self.set(i, num_traits::zero());
        }
    }

    fn scale(&mut self, alpha: Self::Element) {
        if let Some(values) = self.as_mut_slice() {
            kernels::scale_in_place(alpha, values);
            return;
        }
        for i in 0..self.size() {
            let value = self.at(i);
            self.set(i, value * alpha);
        }
    }
}

/// Containers that can be built from any matrix operand
pub trait FromMatrix<M: ?Sized>: Sized {
    fn from_matrix(source: &M) -> Self;
}

/// Containers that can be built from any vector operand
pub trait FromVector<V: ?Sized>: Sized {
    fn from_vector(source: &V) -> Self;
}

impl<'a, M: Matrix + ?Sized> Matrix for &'a M {
    type Order = M::Order;
    const ROWS: Dim = M::ROWS;
    const COLUMNS: Dim = M::COLUMNS;
    const REQUIRES_EVALUATION: bool = M::REQUIRES_EVALUATION;

    #[inline]
    fn rows(&self) -> usize {
        (**self).rows()
    }

    #[inline]
    fn columns(&self) -> usize {
        (**self).columns()
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> Self::Element {
        (**self).at(i, j)
    }

    #[inline]
    fn major_slice(&self, major: usize) -> Option<&[Self::Element]> {
        (**self).major_slice(major)
    }

    fn for_each_stored_in<F>(&self, major: usize, f: F)
    where
        F: FnMut(usize, Self::Element),
    {
        (**self).for_each_stored_in(major, f)
    }

    fn is_aliased(&self, region: Region) -> bool {
        (**self).is_aliased(region)
    }

    fn can_alias(&self, region: Region) -> bool {
        (**self).can_alias(region)
    }

    fn occupies(&self, region: Region) -> bool {
        (**self).occupies(region)
    }

    fn assign_to<D>(&self, target: &mut D)
    where
        D: DenseMatrixMut<Element = Self::Element> + ?Sized,
    {
        (**self).assign_to(target)
    }

    fn add_assign_to<D>(&self, target: &mut D)
    where
        D: DenseMatrixMut<Element = Self::Element> + ?Sized,
    {
        (**self).add_assign_to(target)
    }

    fn sub_assign_to<D>(&self, target: &mut D)
    where
        D: DenseMatrixMut<Element = Self::Element> + ?Sized,
    {
        (**self).sub_assign_to(target)
    }
}

impl<'a, V: Vector + ?Sized> Vector for &'a V {
    type Orient = V::Orient;
    const SIZE: Dim = V::SIZE;
    const REQUIRES_EVALUATION: bool = V::REQUIRES_EVALUATION;

    #[inline]
    fn size(&self) -> usize {
        (**self).size()
    }

    #[inline]
    fn at(&self, i: usize) -> Self::Element {
        (**self).at(i)
    }

    #[inline]
    fn as_slice(&self) -> Option<&[Self::Element]> {
        (**self).as_slice()
    }

    fn for_each_stored<F>(&self, f: F)
    where
        F: FnMut(usize, Self::Element),
    {
        (**self).for_each_stored(f)
    }

    fn is_aliased(&self, region: Region) -> bool {
        (**self).is_aliased(region)
    }

    fn can_alias(&self, region: Region) -> bool {
        (**self).can_alias(region)
    }

    fn occupies(&self, region: Region) -> bool {
        (**self).occupies(region)
    }

    fn assign_to<D>(&self, target: &mut D)
    where
        D: DenseVectorMut<Element = Self::Element> + ?Sized,
    {
        (**self).assign_to(target)
    }

    fn add_assign_to<D>(&self, target: &mut D)
    where
        D: DenseVectorMut<Element = Self::Element> + ?Sized,
    {
        (**self).add_assign_to(target)
    }

    fn sub_assign_to<D>(&self, target: &mut D)
    where
        D: DenseVectorMut<Element = Self::Element> + ?Sized,
    {
        (**self).sub_assign_to(target)
    }
}
