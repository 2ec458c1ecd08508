//! Unmanaged matrix view over caller-provided storage

use crate::error::{Error, Result};
use crate::expressions;
use crate::numeric::Numeric;
use crate::traits::{DenseMatrixMut, Matrix, Operand, Region};
use crate::typetraits::{RowMajor, StorageOrder};
use std::marker::PhantomData;
use std::ops::{AddAssign, SubAssign};
use std::ptr::NonNull;

/// Dense matrix that reads and writes storage it does not own.
///
/// Built safely from a `&mut [T]`, or through [`CustomMatrix::from_raw_parts`]
/// when several views must share one buffer. Shared buffers are the only way an
/// assignment target can overlap its own operands; [`crate::expressions::assign`]
/// detects that through [`Matrix::can_alias`] and evaluates into a temporary.
#[derive(Debug)]
pub struct CustomMatrix<'a, T, SO = RowMajor> {
    ptr: NonNull<T>,
    rows: usize,
    columns: usize,
    marker: PhantomData<(&'a mut [T], SO)>,
}

// Views are only shared across threads by callers of the unsafe constructor.
unsafe impl<'a, T: Send, SO> Send for CustomMatrix<'a, T, SO> {}
unsafe impl<'a, T: Sync, SO> Sync for CustomMatrix<'a, T, SO> {}

impl<'a, T: Numeric, SO: StorageOrder> CustomMatrix<'a, T, SO> {
    /// View `data` as a `rows x columns` matrix in storage order `SO`
    pub fn new(data: &'a mut [T], rows: usize, columns: usize) -> Result<Self> {
        if data.len() != rows * columns {
            return Err(Error::size_mismatch(rows * columns, data.len(), "custom matrix storage"));
        }
        Ok(Self {
            ptr: NonNull::from(data).cast(),
            rows,
            columns,
            marker: PhantomData,
        })
    }

    /// View `rows * columns` elements starting at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reads and writes of `rows * columns` elements for
    /// `'a`. Several views may share storage, but no other reference to it may be
    /// used while a view is alive, and views must not be used concurrently.
    pub unsafe fn from_raw_parts(ptr: *mut T, rows: usize, columns: usize) -> Result<Self> {
        let ptr = NonNull::new(ptr).ok_or_else(|| Error::InvalidParameter("null storage pointer".to_string()))?;
        Ok(Self {
            ptr,
            rows,
            columns,
            marker: PhantomData,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn assign<E: Matrix<Element = T>>(&mut self, expr: E) {
        expressions::assign(self, &expr);
    }

    #[inline(always)]
    fn offset(&self, i: usize, j: usize) -> usize {
        assert!(
            i < self.rows && j < self.columns,
            "index ({i}, {j}) out of bounds for {}x{} matrix",
            self.rows,
            self.columns
        );
        if SO::IS_ROW_MAJOR {
            i * self.columns + j
        } else {
            j * self.rows + i
        }
    }

    fn len(&self) -> usize {
        self.rows * self.columns
    }
}

impl<'a, T: Numeric, SO: StorageOrder> Operand for CustomMatrix<'a, T, SO> {
    type Element = T;
    type Category = SO::DenseTag;
}

impl<'a, T: Numeric, SO: StorageOrder> Matrix for CustomMatrix<'a, T, SO> {
    type Order = SO;

    #[inline]
    fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> T {
        let offset = self.offset(i, j);
        // SAFETY: offset < rows * columns, the extent the constructor vouched for
        unsafe { self.ptr.as_ptr().add(offset).read() }
    }

    #[inline]
    fn major_slice(&self, major: usize) -> Option<&[T]> {
        let n = self.minor_len();
        assert!(major < self.major_len(), "major index {major} out of bounds");
        // SAFETY: row/column `major` lies inside the storage
        Some(unsafe { std::slice::from_raw_parts(self.ptr.as_ptr().add(major * n), n) })
    }

    fn is_aliased(&self, region: Region) -> bool {
        Region::from_raw(self.ptr.as_ptr() as *const T, self.len()).overlaps(region)
    }

    fn occupies(&self, region: Region) -> bool {
        self.region() == region
    }
}

impl<'a, T: Numeric, SO: StorageOrder> DenseMatrixMut for CustomMatrix<'a, T, SO> {
    #[inline]
    fn set(&mut self, i: usize, j: usize, value: T) {
        let offset = self.offset(i, j);
        // SAFETY: as in `at`
        unsafe { self.ptr.as_ptr().add(offset).write(value) }
    }

    fn region(&self) -> Region {
        Region::from_raw(self.ptr.as_ptr() as *const T, self.len()).with_layout::<SO>(self.rows, self.columns)
    }

    #[inline]
    fn major_slice_mut(&mut self, major: usize) -> Option<&mut [T]> {
        let n = self.minor_len();
        assert!(major < self.major_len(), "major index {major} out of bounds");
        // SAFETY: as in `major_slice`; `&mut self` excludes other borrows of this view
        Some(unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr().add(major * n), n) })
    }
}

impl<'a, T: Numeric, SO: StorageOrder, E: Matrix<Element = T>> AddAssign<E> for CustomMatrix<'a, T, SO> {
    fn add_assign(&mut self, expr: E) {
        expressions::add_assign(self, &expr);
    }
}

impl<'a, T: Numeric, SO: StorageOrder, E: Matrix<Element = T>> SubAssign<E> for CustomMatrix<'a, T, SO> {
    fn sub_assign(&mut self, expr: E) {
        expressions::sub_assign(self, &expr);
    }
}
