//! # Package Upgrade Instances
//!
//! A set of named packages with dependencies ("if this is installed, one of
//! those must be installed as well") and pairwise conflicts. Package ids are
//! the 1-based identifiers of the package variables, in declaration order.

use std::{io, path::Path};

use crate::types::Var;

use super::{
    fio::{self, FormatError},
    Registry,
};

/// A dependency group: if `dependent` is installed, at least one of
/// `requirements` must be installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// The package that has the dependency
    pub dependent: Var,
    /// The alternatives that satisfy the dependency
    pub requirements: Vec<Var>,
}

/// Two packages that cannot be installed together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict(pub Var, pub Var);

/// Type representing a package upgrade instance
#[derive(Debug, Clone, Default)]
pub struct PackageInstance {
    packages: Registry<String>,
    dependencies: Vec<Dependency>,
    conflicts: Vec<Conflict>,
}

impl PackageInstance {
    /// Creates an instance without packages
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a package and returns its variable
    ///
    /// # Errors
    ///
    /// If a package with that name was already declared, its variable is
    /// returned as the error value.
    pub fn add_package<S: Into<String>>(&mut self, name: S) -> Result<Var, Var> {
        self.packages.register(name.into())
    }

    /// Adds a dependency group over declared packages
    pub fn add_dependency(&mut self, dependency: Dependency) {
        debug_assert!(
            std::iter::once(&dependency.dependent)
                .chain(&dependency.requirements)
                .all(|v| v.idx() < self.packages.len()),
            "dependency references an undeclared package"
        );
        self.dependencies.push(dependency);
    }

    /// Adds a conflict between two declared packages
    pub fn add_conflict(&mut self, conflict: Conflict) {
        debug_assert!(
            conflict.0.idx() < self.packages.len() && conflict.1.idx() < self.packages.len(),
            "conflict references an undeclared package"
        );
        self.conflicts.push(conflict);
    }

    /// Looks up the variable of a package by name
    #[must_use]
    pub fn package(&self, name: &str) -> Option<Var> {
        self.packages.get(name)
    }

    /// Looks up the name of a package by its 1-based id
    #[must_use]
    pub fn name(&self, id: u32) -> Option<&str> {
        let var = Var::from_ipasir(id).ok()?;
        self.packages.key(var).map(String::as_str)
    }

    /// Gets the package registry
    #[must_use]
    pub fn packages(&self) -> &Registry<String> {
        &self.packages
    }

    /// Gets the number of declared packages
    #[must_use]
    pub fn n_packages(&self) -> usize {
        self.packages.len()
    }

    /// Gets the dependency groups
    #[must_use]
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Gets the conflicts
    #[must_use]
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Checks whether installing exactly the packages with the given 1-based
    /// ids respects all dependencies and conflicts
    #[must_use]
    pub fn is_consistent(&self, installed: &[u32]) -> bool {
        let is_installed = |v: Var| installed.contains(&v.to_ipasir());
        let deps_ok = self.dependencies.iter().all(|dep| {
            !is_installed(dep.dependent) || dep.requirements.iter().any(|&r| is_installed(r))
        });
        let conflicts_ok = self
            .conflicts
            .iter()
            .all(|&Conflict(a, b)| !(is_installed(a) && is_installed(b)));
        deps_ok && conflicts_ok
    }

    /// Parses an instance from a reader
    ///
    /// # Errors
    ///
    /// [`FormatError`] if the input is malformed
    pub fn parse<R: io::BufRead>(reader: R) -> Result<PackageInstance, FormatError> {
        fio::spu::parse_instance(reader)
    }

    /// Parses an instance from a file. With feature `compression`, `.bz2`,
    /// `.gz` and `.xz` files are decompressed.
    ///
    /// # Errors
    ///
    /// If the file cannot be opened or is malformed
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<PackageInstance, FormatError> {
        let reader = fio::open_compressed_uncompressed_read(path)?;
        PackageInstance::parse(io::BufReader::new(reader))
    }
}
