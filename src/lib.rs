//!  __lpsolve__ is a Rust implementation of a sparse simplex solver for linear
//! programs, with branch-and-bound for mixed integer programs.   It solves
//! problems of the form
//!
//! ```text
//! minimize or maximize   c'x + c0
//!           subject to   rl <= Ax <= ru
//!                         l <=  x <= u
//! ```
//!
//! where any subset of the columns can be restricted to integer values, to
//! be semi-continuous (either zero or within their bounds) or to belong to
//! special ordered sets.
//!
//! The API follows lp_solve: rows and columns are numbered from 1, row 0 is
//! the objective, and `1e30` stands for infinity.
//!
//! ```no_run
//! use lpsolve::solver::*;
//!
//! let mut model = Model::new(0, 2).unwrap();
//! model.set_maxim();
//! model.set_obj_fn(&[143., 60.]).unwrap();
//! model.add_constraint(&[120., 210.], ConstraintType::Le, 15000.).unwrap();
//! model.add_constraint(&[110., 30.], ConstraintType::Le, 4000.).unwrap();
//! model.add_constraint(&[1., 1.], ConstraintType::Le, 75.).unwrap();
//!
//! assert_eq!(model.solve(), SolverStatus::Optimal);
//! model.print_objective().unwrap();
//! model.print_solution(1).unwrap();
//! ```
//!
//! ## Features
//!
//! * __Presolve__: removal of empty, singleton, fixed and duplicate rows
//!   and columns, two-element equality substitution and GCD tightening,
//!   with a map from the reduced problem back to the original.
//!
//! * __Simplex__: bounded primal and dual revised simplex with Dantzig,
//!   Devex and steepest edge pricing, Harris ratio test and anti
//!   degeneracy perturbation.
//!
//! * __Branch-and-bound__: depth first search with configurable variable
//!   selection, branching direction, gap tolerances, depth limit and user
//!   callbacks.
//!
//! * __Sensitivity__: dual values, reduced costs and ranging of objective
//!   coefficients and right hand sides.
//!
//! * __Formats__: the LP text format, parameter files and basis files.
//!
//! # License
//!
//! Licensed under Apache License, Version 2.0.

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod algebra;
pub mod formats;
pub mod io;
pub mod solver;
pub mod timers;
