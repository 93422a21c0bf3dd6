//! FFI bindings to HiGHS solver library.
//!
//! This module contains unsafe code for interacting with the C library.
//! [`HighsHandle`] is the only owner of a `Highs_create()` pointer; every
//! call goes through it.
#![allow(unsafe_code)]

use highs_sys::HighsInt;
use std::ffi::{CStr, CString, c_void};
use std::fmt;
use tracing::{debug, trace, warn};

const STATUS_ERROR: HighsInt = -1;

const INTEGRALITY_CONTINUOUS: HighsInt = 0;
const INTEGRALITY_INTEGER: HighsInt = 1;

const SENSE_MINIMIZE: HighsInt = 1;
const SENSE_MAXIMIZE: HighsInt = -1;

/// Lower triangle, column-wise.
const HESSIAN_FORMAT_TRIANGULAR: HighsInt = 1;

/// `primal_solution_status` value of a feasible primal point.
const SOLUTION_STATUS_FEASIBLE: HighsInt = 2;

/// Objective sense for optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveSense {
    /// Minimize the objective
    Minimize,
    /// Maximize the objective
    Maximize,
}

/// Option value types for HiGHS solver configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum HighsOption {
    Bool(bool),
    Int(i32),
    Float(f64),
    Str(String),
}

/// Errors returned by the HiGHS handle.
#[derive(Debug, Clone, PartialEq)]
pub enum HighsError {
    /// `Highs_create` returned null.
    CreateFailed,
    /// The handle was used after [`HighsHandle::dispose`].
    Disposed { operation: &'static str },
    /// A HiGHS call returned an error status.
    Call {
        operation: &'static str,
        status: HighsInt,
    },
    /// A HiGHS call rejected an option.
    Option { name: String, status: HighsInt },
    /// A name or string value contains an interior nul byte.
    InvalidString { value: String },
    /// An index or count does not fit into `HighsInt`.
    IndexOverflow { value: usize },
    /// HiGHS has no quadratic constraint rows.
    QuadraticConstraint { name: String },
    ColumnCoefficientLengthMismatch {
        columns: usize,
        coefficients: usize,
    },
    ColumnIndexOutOfBounds {
        column_index: usize,
        num_columns: usize,
    },
    /// A feasible status was reported without a feasible primal point.
    NoPrimalSolution { solution_status: HighsInt },
}

impl fmt::Display for HighsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighsError::CreateFailed => write!(f, "Highs_create returned a null handle"),
            HighsError::Disposed { operation } => {
                write!(f, "{} called on a disposed handle", operation)
            }
            HighsError::Call { operation, status } => {
                write!(f, "{} returned status {}", operation, status)
            }
            HighsError::Option { name, status } => {
                write!(f, "option '{}' rejected with status {}", name, status)
            }
            HighsError::InvalidString { value } => {
                write!(f, "string contains a nul byte: {:?}", value)
            }
            HighsError::IndexOverflow { value } => {
                write!(f, "index {} does not fit into HighsInt", value)
            }
            HighsError::QuadraticConstraint { name } => write!(
                f,
                "constraint '{}' is quadratic; HiGHS supports linear rows only",
                name
            ),
            HighsError::ColumnCoefficientLengthMismatch {
                columns,
                coefficients,
            } => write!(
                f,
                "columns length ({}) must match coefficients length ({})",
                columns, coefficients
            ),
            HighsError::ColumnIndexOutOfBounds {
                column_index,
                num_columns,
            } => write!(
                f,
                "column index {} out of bounds (num_columns = {})",
                column_index, num_columns
            ),
            HighsError::NoPrimalSolution { solution_status } => write!(
                f,
                "no feasible primal solution available (primal_solution_status = {})",
                solution_status
            ),
        }
    }
}

impl std::error::Error for HighsError {}

/// Owner of one native HiGHS instance.
///
/// The pointer is released exactly once: by an explicit [`dispose`] or, as
/// a fallback, on drop. Every call after disposal fails with
/// [`HighsError::Disposed`].
///
/// [`dispose`]: HighsHandle::dispose
pub struct HighsHandle {
    ptr: *mut c_void,
    col_names: Vec<String>,
    row_names: Vec<String>,
}

// The HiGHS instance is not tied to the thread that created it; the handle
// is never shared, so it is `Send` but not `Sync`.
unsafe impl Send for HighsHandle {}

fn to_highs_int(value: usize) -> Result<HighsInt, HighsError> {
    HighsInt::try_from(value).map_err(|_| HighsError::IndexOverflow { value })
}

fn c_string(value: &str) -> Result<CString, HighsError> {
    CString::new(value).map_err(|_| HighsError::InvalidString {
        value: value.to_string(),
    })
}

fn check(operation: &'static str, status: HighsInt) -> Result<HighsInt, HighsError> {
    if status == STATUS_ERROR {
        warn!(
            component = "highs",
            operation,
            status = "error",
            status_code = status,
            "HiGHS call failed"
        );
        return Err(HighsError::Call { operation, status });
    }
    Ok(status)
}

impl HighsHandle {
    /// Create a new native instance.
    pub fn new() -> Result<Self, HighsError> {
        let ptr = unsafe { highs_sys::Highs_create() };
        if ptr.is_null() {
            return Err(HighsError::CreateFailed);
        }
        debug!(
            component = "highs",
            operation = "create",
            status = "success",
            "Created HiGHS instance"
        );
        Ok(Self {
            ptr,
            col_names: Vec::new(),
            row_names: Vec::new(),
        })
    }

    fn ptr(&self, operation: &'static str) -> Result<*mut c_void, HighsError> {
        if self.ptr.is_null() {
            Err(HighsError::Disposed { operation })
        } else {
            Ok(self.ptr)
        }
    }

    /// Whether the native instance has been released.
    pub fn is_disposed(&self) -> bool {
        self.ptr.is_null()
    }

    /// Release the native instance. Calling this more than once is a no-op.
    pub fn dispose(&mut self) {
        if self.ptr.is_null() {
            return;
        }
        unsafe { highs_sys::Highs_destroy(self.ptr) };
        self.ptr = std::ptr::null_mut();
        debug!(
            component = "highs",
            operation = "dispose",
            status = "success",
            "Released HiGHS instance"
        );
    }

    /// Add a column with bounds and objective cost. Returns its index.
    ///
    /// `name` is kept on the handle for diagnostics, see [`Self::col_name`].
    pub fn add_col(
        &mut self,
        cost: f64,
        lower: f64,
        upper: f64,
        name: &str,
    ) -> Result<usize, HighsError> {
        let ptr = self.ptr("add_col")?;
        let status = unsafe {
            highs_sys::Highs_addCol(ptr, cost, lower, upper, 0, std::ptr::null(), std::ptr::null())
        };
        check("add_col", status)?;
        let index = self.col_names.len();
        self.col_names.push(name.to_string());
        trace!(
            component = "highs",
            operation = "add_col",
            status = "success",
            col = index,
            name,
            cost,
            lower,
            upper,
            "Added column"
        );
        Ok(index)
    }

    /// Name given to `col` when it was added.
    pub fn col_name(&self, col: usize) -> Option<&str> {
        self.col_names.get(col).map(String::as_str)
    }

    /// Mark a column integer or continuous.
    pub fn set_integrality(&mut self, col: usize, integer: bool) -> Result<(), HighsError> {
        let ptr = self.ptr("change_col_integrality")?;
        let value = if integer {
            INTEGRALITY_INTEGER
        } else {
            INTEGRALITY_CONTINUOUS
        };
        let status =
            unsafe { highs_sys::Highs_changeColIntegrality(ptr, to_highs_int(col)?, value) };
        check("change_col_integrality", status)?;
        Ok(())
    }

    /// Replace the objective cost of a column.
    pub fn set_col_cost(&mut self, col: usize, cost: f64) -> Result<(), HighsError> {
        let ptr = self.ptr("change_col_cost")?;
        let status = unsafe { highs_sys::Highs_changeColCost(ptr, to_highs_int(col)?, cost) };
        check("change_col_cost", status)?;
        Ok(())
    }

    /// Add a linear row `lower <= sum(coefficients[k] * x[columns[k]]) <= upper`.
    ///
    /// Returns the row index. `name` is kept on the Rust side for
    /// diagnostics, see [`HighsHandle::row_name`].
    pub fn add_row(
        &mut self,
        lower: f64,
        upper: f64,
        columns: &[usize],
        coefficients: &[f64],
        name: &str,
    ) -> Result<usize, HighsError> {
        if columns.len() != coefficients.len() {
            return Err(HighsError::ColumnCoefficientLengthMismatch {
                columns: columns.len(),
                coefficients: coefficients.len(),
            });
        }
        let mut index = Vec::with_capacity(columns.len());
        for &col in columns {
            if col >= self.col_names.len() {
                return Err(HighsError::ColumnIndexOutOfBounds {
                    column_index: col,
                    num_columns: self.col_names.len(),
                });
            }
            index.push(to_highs_int(col)?);
        }

        let ptr = self.ptr("add_row")?;
        let status = unsafe {
            highs_sys::Highs_addRow(
                ptr,
                lower,
                upper,
                to_highs_int(index.len())?,
                index.as_ptr(),
                coefficients.as_ptr(),
            )
        };
        check("add_row", status)?;

        let row = self.row_names.len();
        self.row_names.push(name.to_string());
        trace!(
            component = "highs",
            operation = "add_row",
            status = "success",
            row,
            name,
            lower,
            upper,
            num_coeffs = columns.len(),
            "Added row"
        );
        Ok(row)
    }

    /// Name a row was registered with.
    pub fn row_name(&self, row: usize) -> Option<&str> {
        self.row_names.get(row).map(String::as_str)
    }

    /// Pass the Hessian of the objective `c'x + 1/2 x'Qx`.
    ///
    /// The matrix is the lower triangle of `Q` in compressed column form:
    /// `start[j]` is the offset of column `j` in `index`/`value`, and every
    /// column lists its diagonal entry first.
    pub fn pass_hessian(
        &mut self,
        dim: usize,
        start: &[usize],
        index: &[usize],
        value: &[f64],
    ) -> Result<(), HighsError> {
        if index.len() != value.len() {
            return Err(HighsError::ColumnCoefficientLengthMismatch {
                columns: index.len(),
                coefficients: value.len(),
            });
        }
        let start = start
            .iter()
            .map(|&s| to_highs_int(s))
            .collect::<Result<Vec<_>, _>>()?;
        let index = index
            .iter()
            .map(|&i| to_highs_int(i))
            .collect::<Result<Vec<_>, _>>()?;

        let ptr = self.ptr("pass_hessian")?;
        let status = unsafe {
            highs_sys::Highs_passHessian(
                ptr,
                to_highs_int(dim)?,
                to_highs_int(value.len())?,
                HESSIAN_FORMAT_TRIANGULAR,
                start.as_ptr(),
                index.as_ptr(),
                value.as_ptr(),
            )
        };
        check("pass_hessian", status)?;
        debug!(
            component = "highs",
            operation = "pass_hessian",
            status = "success",
            dim,
            nnz = value.len(),
            "Passed Hessian"
        );
        Ok(())
    }

    pub fn set_objective_sense(&mut self, sense: ObjectiveSense) -> Result<(), HighsError> {
        let ptr = self.ptr("change_objective_sense")?;
        let value = match sense {
            ObjectiveSense::Minimize => SENSE_MINIMIZE,
            ObjectiveSense::Maximize => SENSE_MAXIMIZE,
        };
        let status = unsafe { highs_sys::Highs_changeObjectiveSense(ptr, value) };
        check("change_objective_sense", status)?;
        debug!(
            component = "highs",
            operation = "set_objective_sense",
            status = "success",
            ?sense,
            "Setting objective sense"
        );
        Ok(())
    }

    pub fn set_objective_offset(&mut self, offset: f64) -> Result<(), HighsError> {
        let ptr = self.ptr("change_objective_offset")?;
        let status = unsafe { highs_sys::Highs_changeObjectiveOffset(ptr, offset) };
        check("change_objective_offset", status)?;
        Ok(())
    }

    /// Set a HiGHS option by name.
    pub fn set_option(&mut self, name: &str, value: &HighsOption) -> Result<(), HighsError> {
        let ptr = self.ptr("set_option")?;
        let c_name = c_string(name)?;
        let status = match value {
            HighsOption::Bool(val) => unsafe {
                highs_sys::Highs_setBoolOptionValue(ptr, c_name.as_ptr(), HighsInt::from(*val))
            },
            HighsOption::Int(val) => unsafe {
                highs_sys::Highs_setIntOptionValue(ptr, c_name.as_ptr(), *val as HighsInt)
            },
            HighsOption::Float(val) => unsafe {
                highs_sys::Highs_setDoubleOptionValue(ptr, c_name.as_ptr(), *val)
            },
            HighsOption::Str(val) => {
                let c_value = c_string(val)?;
                unsafe { highs_sys::Highs_setStringOptionValue(ptr, c_name.as_ptr(), c_value.as_ptr()) }
            }
        };
        if status == STATUS_ERROR {
            warn!(
                component = "highs",
                operation = "set_option",
                status = "error",
                option = name,
                ?value,
                status_code = status,
                "HiGHS rejected option"
            );
            return Err(HighsError::Option {
                name: name.to_string(),
                status,
            });
        }
        trace!(
            component = "highs",
            operation = "set_option",
            status = "success",
            option = name,
            ?value,
            "Set option"
        );
        Ok(())
    }

    /// Run the solver. A warning return (e.g. a limit was reached) is not
    /// an error; the model status tells what happened.
    pub fn run(&mut self) -> Result<HighsInt, HighsError> {
        let ptr = self.ptr("run")?;
        let status = unsafe { highs_sys::Highs_run(ptr) };
        check("run", status)
    }

    /// Raw HiGHS model status code of the latest run.
    pub fn model_status(&self) -> Result<HighsInt, HighsError> {
        let ptr = self.ptr("get_model_status")?;
        Ok(unsafe { highs_sys::Highs_getModelStatus(ptr) })
    }

    pub fn objective_value(&self) -> Result<f64, HighsError> {
        let ptr = self.ptr("get_objective_value")?;
        Ok(unsafe { highs_sys::Highs_getObjectiveValue(ptr) })
    }

    pub fn num_cols(&self) -> Result<usize, HighsError> {
        let ptr = self.ptr("get_num_col")?;
        let count = unsafe { highs_sys::Highs_getNumCol(ptr) };
        Ok(usize::try_from(count).unwrap_or(0))
    }

    pub fn num_rows(&self) -> Result<usize, HighsError> {
        let ptr = self.ptr("get_num_row")?;
        let count = unsafe { highs_sys::Highs_getNumRow(ptr) };
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Read an integer info value. Returns `None` when HiGHS does not
    /// provide it for the latest run.
    pub fn int_info(&self, name: &str) -> Result<Option<HighsInt>, HighsError> {
        let ptr = self.ptr("get_int_info")?;
        let c_name = c_string(name)?;
        let mut value: HighsInt = 0;
        let status =
            unsafe { highs_sys::Highs_getIntInfoValue(ptr, c_name.as_ptr(), &raw mut value) };
        if status == highs_sys::STATUS_OK {
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    /// Get the simplex iteration count for the latest solve.
    pub fn simplex_iteration_count(&self) -> u64 {
        match self.int_info("simplex_iteration_count") {
            Ok(Some(value)) if value >= 0 => value as u64,
            _ => 0,
        }
    }

    /// Primal column values of the latest run.
    ///
    /// # Errors
    ///
    /// Returns [`HighsError::NoPrimalSolution`] when HiGHS holds no feasible
    /// primal point, and [`HighsError::Call`] when the values cannot be read.
    pub fn col_values(&self) -> Result<Vec<f64>, HighsError> {
        let ptr = self.ptr("get_solution")?;
        let num_cols = self.num_cols()?;
        if num_cols == 0 {
            return Ok(Vec::new());
        }

        let solution_status = self.int_info("primal_solution_status")?.unwrap_or(0);
        if solution_status != SOLUTION_STATUS_FEASIBLE {
            return Err(HighsError::NoPrimalSolution { solution_status });
        }

        let num_rows = self.num_rows()?;
        let mut col_value = vec![0.0; num_cols];
        let mut col_dual = vec![0.0; num_cols];
        let mut row_value = vec![0.0; num_rows];
        let mut row_dual = vec![0.0; num_rows];
        let status = unsafe {
            highs_sys::Highs_getSolution(
                ptr,
                col_value.as_mut_ptr(),
                col_dual.as_mut_ptr(),
                row_value.as_mut_ptr(),
                row_dual.as_mut_ptr(),
            )
        };
        check("get_solution", status)?;
        Ok(col_value)
    }
}

impl Drop for HighsHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for HighsHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighsHandle")
            .field("disposed", &self.is_disposed())
            .field("num_cols", &self.col_names.len())
            .field("num_rows", &self.row_names.len())
            .finish_non_exhaustive()
    }
}

/// Return the HiGHS solver version string, if available.
pub fn highs_version() -> Option<String> {
    unsafe {
        let ptr = highs_sys::Highs_version();
        if ptr.is_null() {
            None
        } else {
            CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
        }
    }
}
