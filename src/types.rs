//! # Common Types for MaxSAT Reductions
//!
//! Common types used throughout the library to guarantee type safety.
//!
//! Variables are indexed from 0 internally. Everything that crosses a text
//! boundary (DIMACS files, solver output, decoded solutions) uses the 1-based
//! IPASIR convention via [`Var::to_ipasir`] and [`Lit::to_ipasir`].

use std::{fmt, ops};

use thiserror::Error;

pub mod constraints;
pub use constraints::Clause;

/// The hash map to use throughout the library
#[cfg(feature = "fxhash")]
pub type RsHashMap<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fxhash"))]
pub type RsHashMap<K, V> = std::collections::HashMap<K, V>;

/// Type representing boolean variables in a MaxSAT problem. Variables indexing
/// starts from 0 and the maximum index is `(u32::MAX - 1) / 2`, since literals
/// are represented as a single `u32` as well.
#[derive(Hash, Eq, PartialEq, PartialOrd, Clone, Copy, Ord, Debug)]
#[repr(transparent)]
pub struct Var {
    idx: u32,
}

impl Var {
    /// The maximum index that can be represented.
    pub const MAX_IDX: u32 = (u32::MAX - 1) / 2;

    /// Creates a new variables with a given index.
    /// Indices start from 0.
    ///
    /// # Panics
    ///
    /// If `idx > Var::MAX_IDX`.
    #[must_use]
    pub fn new(idx: u32) -> Var {
        assert!(idx <= Var::MAX_IDX, "variable index too high");
        Var { idx }
    }

    /// Creates a new variables with a given index.
    ///
    /// # Errors
    ///
    /// `TypeError::IdxTooHigh(idx, Var::MAX_IDX)` if `idx > Var::MAX_IDX`.
    pub fn new_with_error(idx: u32) -> Result<Var, TypeError> {
        if idx > Var::MAX_IDX {
            return Err(TypeError::IdxTooHigh(idx, Var::MAX_IDX));
        }
        Ok(Var { idx })
    }

    /// Creates a literal that is not negated.
    ///
    /// # Examples
    ///
    /// ```
    /// use satreduce::types::{Lit, Var};
    ///
    /// let var = Var::new(5);
    /// let lit = Lit::positive(5);
    ///
    /// assert_eq!(lit, var.pos_lit());
    /// ```
    #[inline]
    #[must_use]
    pub fn pos_lit(self) -> Lit {
        Lit::new_unchecked(self.idx, false)
    }

    /// Creates a negated literal.
    #[inline]
    #[must_use]
    pub fn neg_lit(self) -> Lit {
        Lit::new_unchecked(self.idx, true)
    }

    /// Returns the index of the variable as a `usize` for indexing data
    /// structures. For the 32 bit index use [`Var::idx32`].
    #[inline]
    #[must_use]
    pub fn idx(self) -> usize {
        self.idx as usize
    }

    /// Returns the 32 bit index of the variable.
    #[inline]
    #[must_use]
    pub fn idx32(self) -> u32 {
        self.idx
    }

    /// Converts the variable to its 1-based DIMACS identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use satreduce::types::Var;
    ///
    /// assert_eq!(Var::new(0).to_ipasir(), 1);
    /// ```
    #[inline]
    #[must_use]
    pub fn to_ipasir(self) -> u32 {
        self.idx + 1
    }

    /// Creates a variable from its 1-based DIMACS identifier
    ///
    /// # Errors
    ///
    /// If `id` is zero or too high.
    pub fn from_ipasir(id: u32) -> Result<Var, TypeError> {
        if id == 0 {
            return Err(TypeError::IpasirZero);
        }
        Var::new_with_error(id - 1)
    }
}

/// Incrementing variables
impl ops::Add<u32> for Var {
    type Output = Var;

    fn add(self, rhs: u32) -> Self::Output {
        Var {
            idx: self.idx + rhs,
        }
    }
}

impl ops::AddAssign<u32> for Var {
    fn add_assign(&mut self, rhs: u32) {
        self.idx += rhs;
    }
}

/// Decrementing variables
impl ops::Sub<u32> for Var {
    type Output = Var;

    fn sub(self, rhs: u32) -> Self::Output {
        Var {
            idx: self.idx - rhs,
        }
    }
}

/// Variables are displayed by their 1-based identifier
impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.to_ipasir())
    }
}

/// More easily creates variables. Mainly used in tests.
///
/// ```
/// use satreduce::{var, types::Var};
///
/// assert_eq!(var![42], Var::new(42));
/// ```
#[macro_export]
macro_rules! var {
    ($v:expr) => {
        $crate::types::Var::new($v)
    };
}

/// Type representing literals, possibly negated boolean variables.
#[derive(Hash, Eq, PartialEq, PartialOrd, Ord, Clone, Copy, Debug)]
#[repr(transparent)]
pub struct Lit {
    /// Literal representation is `idx << 1` with the last bit representing
    /// whether the literal is negated or not.
    lidx: u32,
}

impl Lit {
    #[inline]
    fn represent(idx: u32, negated: bool) -> u32 {
        (idx << 1) + u32::from(negated)
    }

    /// Creates a new (negated or not) literal with a given index.
    ///
    /// # Panics
    ///
    /// If `idx > Var::MAX_IDX`.
    #[must_use]
    pub fn new(idx: u32, negated: bool) -> Lit {
        assert!(idx <= Var::MAX_IDX, "variable index too high");
        Lit {
            lidx: Lit::represent(idx, negated),
        }
    }

    #[inline]
    fn new_unchecked(idx: u32, negated: bool) -> Lit {
        Lit {
            lidx: Lit::represent(idx, negated),
        }
    }

    /// Creates a new positive literal with a given index.
    #[inline]
    #[must_use]
    pub fn positive(idx: u32) -> Lit {
        Lit::new(idx, false)
    }

    /// Creates a new negated literal with a given index.
    #[inline]
    #[must_use]
    pub fn negative(idx: u32) -> Lit {
        Lit::new(idx, true)
    }

    /// Create a literal from a signed DIMACS integer.
    ///
    /// # Errors
    ///
    /// If the value is zero or the index too high.
    pub fn from_ipasir(val: i32) -> Result<Lit, TypeError> {
        if val == 0 {
            return Err(TypeError::IpasirZero);
        }
        let var = Var::new_with_error(val.unsigned_abs() - 1)?;
        Ok(if val < 0 { var.neg_lit() } else { var.pos_lit() })
    }

    /// Gets the variable index of the literal
    #[inline]
    #[must_use]
    pub fn vidx(self) -> usize {
        (self.lidx >> 1) as usize
    }

    /// Gets the variable that the literal corresponds to.
    #[inline]
    #[must_use]
    pub fn var(self) -> Var {
        Var {
            idx: self.lidx >> 1,
        }
    }

    /// True if the literal is positive.
    #[inline]
    #[must_use]
    pub fn is_pos(self) -> bool {
        (self.lidx & 1u32) == 0
    }

    /// True if the literal is negated.
    #[inline]
    #[must_use]
    pub fn is_neg(self) -> bool {
        (self.lidx & 1u32) == 1
    }

    /// Converts the literal to a signed DIMACS integer. The integer has
    /// magnitude idx+1 and is negative if the literal is negated.
    ///
    /// # Panics
    ///
    /// If the literal does not fit into an `i32`.
    #[must_use]
    pub fn to_ipasir(self) -> i32 {
        let idx: i32 = (self.vidx() + 1)
            .try_into()
            .expect("variable index too high to fit in i32");
        if self.is_neg() {
            -idx
        } else {
            idx
        }
    }
}

/// Negating literals with the `!` operator.
impl ops::Not for Lit {
    type Output = Lit;

    #[inline]
    fn not(self) -> Lit {
        Lit {
            lidx: self.lidx ^ 1u32,
        }
    }
}

/// Negating literals with the unary `-` operator.
impl ops::Neg for Lit {
    type Output = Lit;

    #[inline]
    fn neg(self) -> Lit {
        !self
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_neg() {
            write!(f, "~{}", self.var())
        } else {
            write!(f, "{}", self.var())
        }
    }
}

/// More easily creates literals. Mainly used in tests.
///
/// ```
/// use satreduce::{lit, types::Lit};
///
/// assert_eq!(lit![42], Lit::positive(42));
/// assert_eq!(!lit![42], Lit::negative(42));
/// ```
#[macro_export]
macro_rules! lit {
    ($l:expr) => {
        $crate::types::Lit::positive($l)
    };
}

/// Creates a literal from a signed DIMACS integer. Mainly used in tests.
///
/// ```
/// use satreduce::{lit, ipasir_lit};
///
/// assert_eq!(ipasir_lit![42], lit![41]);
/// assert_eq!(ipasir_lit![-42], !lit![41]);
/// ```
#[macro_export]
macro_rules! ipasir_lit {
    ($l:expr) => {
        $crate::types::Lit::from_ipasir($l).unwrap()
    };
}

/// Ternary value assigned to a literal or variable, including possible "don't care"
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TernaryVal {
    /// Positive assignment.
    True,
    /// Negative assignment.
    False,
    /// Not assigned.
    DontCare,
}

impl fmt::Display for TernaryVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TernaryVal::True => write!(f, "1"),
            TernaryVal::False => write!(f, "0"),
            TernaryVal::DontCare => write!(f, "_"),
        }
    }
}

impl fmt::Debug for TernaryVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<bool> for TernaryVal {
    fn from(value: bool) -> Self {
        if value {
            return TernaryVal::True;
        }
        TernaryVal::False
    }
}

/// Type representing an assignment of variables.
#[derive(Clone, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct Assignment {
    assignment: Vec<TernaryVal>,
}

impl Assignment {
    /// Get the value that the assignment gives a variable.
    /// If the variable is not included, will return `TernaryVal::DontCare`.
    #[must_use]
    pub fn var_value(&self, var: Var) -> TernaryVal {
        self.assignment
            .get(var.idx())
            .copied()
            .unwrap_or(TernaryVal::DontCare)
    }

    /// Same as [`Assignment::var_value`], but for literals.
    #[must_use]
    pub fn lit_value(&self, lit: Lit) -> TernaryVal {
        match (self.var_value(lit.var()), lit.is_neg()) {
            (TernaryVal::DontCare, _) => TernaryVal::DontCare,
            (val, false) => val,
            (TernaryVal::True, true) => TernaryVal::False,
            (TernaryVal::False, true) => TernaryVal::True,
        }
    }

    /// Assigns a variable in the assignment
    pub fn assign_var(&mut self, var: Var, val: TernaryVal) {
        if self.assignment.len() < var.idx() + 1 {
            self.assignment.resize(var.idx() + 1, TernaryVal::DontCare);
        }
        self.assignment[var.idx()] = val;
    }

    /// Assigns a literal to true
    pub fn assign_lit(&mut self, lit: Lit) {
        self.assign_var(lit.var(), TernaryVal::from(lit.is_pos()));
    }

    /// Truncates the assignment to only include variables up to `max_var`
    #[must_use]
    pub fn truncate(mut self, max_var: Var) -> Self {
        self.assignment.truncate(max_var.idx() + 1);
        self
    }

    /// Get the maximum variable in the assignment
    #[must_use]
    pub fn max_var(&self) -> Option<Var> {
        let len = u32::try_from(self.assignment.len()).ok()?;
        len.checked_sub(1).map(Var::new)
    }

    /// Gets the number of variables covered by the assignment
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignment.len()
    }

    /// Checks whether the assignment is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignment.is_empty()
    }

    /// Gets the first variable up to `max_var` that is not assigned, if any
    #[must_use]
    pub fn first_unassigned(&self, max_var: Var) -> Option<Var> {
        (0..=max_var.idx32())
            .map(Var::new)
            .find(|&v| self.var_value(v) == TernaryVal::DontCare)
    }

    /// Iterates over the literals assigned by the assignment, in variable order
    pub fn iter(&self) -> impl Iterator<Item = Lit> + '_ {
        self.assignment
            .iter()
            .zip(0u32..)
            .filter_map(|(tv, idx)| match tv {
                TernaryVal::True => Some(Var::new(idx).pos_lit()),
                TernaryVal::False => Some(Var::new(idx).neg_lit()),
                TernaryVal::DontCare => None,
            })
    }

    /// Extends the assignment from a value line of MaxSAT solver output with
    /// signed integers, e.g., `v 1 -2 3 0`
    ///
    /// # Errors
    ///
    /// If a token is not an integer or a variable is assigned both ways.
    pub fn extend_from_vline(&mut self, line: &str) -> Result<(), InvalidVLine> {
        let line = strip_vline_tag(line)?;
        for token in line.split_whitespace() {
            let val: i32 = token
                .parse()
                .map_err(|_| InvalidVLine::Token(token.to_string()))?;
            if val == 0 {
                continue;
            }
            let lit = Lit::from_ipasir(val).map_err(|_| InvalidVLine::Token(token.to_string()))?;
            if self.lit_value(lit) == TernaryVal::False {
                return Err(InvalidVLine::ConflictingAssignment(lit.var()));
            }
            self.assign_lit(lit);
        }
        Ok(())
    }

    /// Creates an assignment from a value line in the MaxSAT evaluation 2022
    /// binary format, e.g., `v 0110`, where character `i` is the value of
    /// variable `i + 1`
    ///
    /// # Errors
    ///
    /// If the line contains a character other than `0` and `1`.
    pub fn from_binary_vline(line: &str) -> Result<Assignment, InvalidVLine> {
        let line = strip_vline_tag(line)?;
        line.trim()
            .chars()
            .map(|c| match c {
                '0' => Ok(TernaryVal::False),
                '1' => Ok(TernaryVal::True),
                _ => Err(InvalidVLine::Token(line.trim().to_string())),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Assignment::from)
    }
}

fn strip_vline_tag(line: &str) -> Result<&str, InvalidVLine> {
    let mut chars = line.chars();
    match chars.next() {
        Some('v') => Ok(chars.as_str()),
        Some(tag) => Err(InvalidVLine::InvalidTag(tag)),
        None => Err(InvalidVLine::EmptyLine),
    }
}

impl fmt::Debug for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.assignment.iter().try_for_each(|tv| write!(f, "{tv}"))
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromIterator<Lit> for Assignment {
    fn from_iter<T: IntoIterator<Item = Lit>>(iter: T) -> Self {
        let mut assignment = Assignment::default();
        iter.into_iter().for_each(|l| assignment.assign_lit(l));
        assignment
    }
}

impl From<Vec<TernaryVal>> for Assignment {
    fn from(assignment: Vec<TernaryVal>) -> Self {
        Self { assignment }
    }
}

/// Errors related to types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TypeError {
    /// The requested index is too high.
    /// Contains the requested and the maximum index.
    #[error("index {0} is too high (maximum {1})")]
    IdxTooHigh(u32, u32),
    /// IPASIR index is zero
    #[error("zero is an invalid IPASIR literal")]
    IpasirZero,
}

/// Errors in a value line of solver output
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvalidVLine {
    /// The line does not start with `v`
    #[error("the value line does not start with 'v' but with '{0}'")]
    InvalidTag(char),
    /// A token is not a valid literal
    #[error("invalid token in value line: {0}")]
    Token(String),
    /// The same variable was assigned different values
    #[error("the solver assigned {0} different values")]
    ConflictingAssignment(Var),
    /// The line is empty
    #[error("empty value line")]
    EmptyLine,
}
