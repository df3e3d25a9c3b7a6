//! Enumerations and option sets used to configure the solver.
//!
//! Every enumeration carries the numeric code used by lp_solve and a
//! symbolic name, and every option set keeps lp_solve's bit values.  This
//! keeps parameter files interchangeable and lets the symbolic names
//! double as the textual representation in those files.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

// ---------------------------------
// option set (bitmask) types
// ---------------------------------

macro_rules! option_set {
    (
        $(#[$outer:meta])*
        pub struct $name:ident {
            $(
                $(#[$inner:meta])*
                const $flag:ident = $value:expr => $label:literal;
            )*
        }
    ) => {
        $(#[$outer])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(u32);

        impl $name {
            $(
                $(#[$inner])*
                pub const $flag: Self = Self($value);
            )*

            const NAMED: &'static [(&'static str, u32)] = &[$(($label, $value),)*];

            /// The set with no options enabled
            pub const fn empty() -> Self {
                Self(0)
            }

            /// The set with every known option enabled
            pub fn all() -> Self {
                Self(Self::NAMED.iter().fold(0, |acc, (_, b)| acc | b))
            }

            /// Raw bit value
            pub const fn bits(self) -> u32 {
                self.0
            }

            /// Construct from raw bits.  Fails if unknown bits are set.
            pub fn from_bits(bits: u32) -> Option<Self> {
                if bits & !Self::all().0 == 0 {
                    Some(Self(bits))
                } else {
                    None
                }
            }

            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }

            /// true if every option in `other` is also in `self`
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            /// true if any option in `other` is also in `self`
            pub const fn intersects(self, other: Self) -> bool {
                self.0 & other.0 != 0
            }

            pub fn insert(&mut self, other: Self) {
                self.0 |= other.0;
            }

            pub fn remove(&mut self, other: Self) {
                self.0 &= !other.0;
            }

            /// Look up a single option by its symbolic name (case insensitive)
            pub fn from_name(name: &str) -> Option<Self> {
                Self::NAMED
                    .iter()
                    .find(|(label, _)| label.eq_ignore_ascii_case(name))
                    .map(|&(_, bits)| Self(bits))
            }

            /// Symbolic names of the options contained in the set.  The
            /// empty set is named by its zero valued option, if one exists.
            pub fn names(self) -> Vec<&'static str> {
                if self.0 == 0 {
                    return Self::NAMED
                        .iter()
                        .filter(|(_, bits)| *bits == 0)
                        .map(|(label, _)| *label)
                        .collect();
                }
                Self::NAMED
                    .iter()
                    .filter(|(_, bits)| *bits != 0 && self.0 & bits == *bits)
                    .map(|(label, _)| *label)
                    .collect()
            }
        }

        impl BitOr for $name {
            type Output = Self;
            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl BitAnd for $name {
            type Output = Self;
            fn bitand(self, rhs: Self) -> Self {
                Self(self.0 & rhs.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.names().join(" | "))
            }
        }
    };
}

option_set! {
    /// Modifiers for the simplex pricing rule
    pub struct PivotModes {
        /// scan a rotating block of candidates instead of all of them
        const PARTIAL = 16 => "PRICE_PARTIAL";
        /// temporarily fall back to Bland's rule when the solver stalls
        const ADAPTIVE = 32 => "PRICE_ADAPTIVE";
        /// randomly perturb candidate scores to break ties
        const RANDOMIZE = 128 => "PRICE_RANDOMIZE";
        /// Harris' two pass ratio test
        const HARRISTWOPASS = 4096 => "PRICE_HARRISTWOPASS";
        /// never flip boxed variables between their bounds in the ratio test
        const NOBOUNDFLIP = 65536 => "PRICE_NOBOUNDFLIP";
    }
}

option_set! {
    /// Modifiers for the scaling algorithm
    pub struct ScaleModes {
        /// round scale factors to powers of two
        const POWER2 = 32 => "SCALE_POWER2";
        /// finish with a pass making every column's largest entry 1
        const EQUILIBRATE = 64 => "SCALE_EQUILIBRATE";
        /// also scale integer columns
        const INTEGERS = 128 => "SCALE_INTEGERS";
    }
}

option_set! {
    /// Presolve reductions and post-solve requests
    pub struct PresolveModes {
        const NONE = 0 => "PRESOLVE_NONE";
        /// empty and singleton rows
        const ROWS = 1 => "PRESOLVE_ROWS";
        /// empty and fixed columns
        const COLS = 2 => "PRESOLVE_COLS";
        /// duplicate and parallel rows
        const LINDEP = 4 => "PRESOLVE_LINDEP";
        /// substitution through two-element equalities
        const ELIMEQ2 = 256 => "PRESOLVE_ELIMEQ2";
        /// GCD reduction of all-integer rows
        const REDUCEGCD = 1024 => "PRESOLVE_REDUCEGCD";
        /// compute dual values
        const DUALS = 524288 => "PRESOLVE_DUALS";
        /// compute dual values and sensitivity ranges
        const SENSDUALS = 1048576 => "PRESOLVE_SENSDUALS";
    }
}

impl PresolveModes {
    /// the options that actually remove rows or columns
    pub fn reductions(self) -> Self {
        self & (Self::ROWS | Self::COLS | Self::LINDEP | Self::ELIMEQ2 | Self::REDUCEGCD)
    }
}

option_set! {
    /// Modifiers for the branch-and-bound node selection
    pub struct NodeModes {
        /// select the lowest priority (weight) variable last instead of first
        const WEIGHTREVERSE = 8 => "NODE_WEIGHTREVERSEMODE";
        /// reverse the automatic branching direction
        const BRANCHREVERSE = 16 => "NODE_BRANCHREVERSEMODE";
        /// explore the open node with the best bound next
        const GREEDY = 32 => "NODE_GREEDYMODE";
        /// explore the most recently created node next
        const DEPTHFIRST = 128 => "NODE_DEPTHFIRSTMODE";
        /// randomize variable choice and child ordering
        const RANDOMIZE = 256 => "NODE_RANDOMIZEMODE";
        /// explore the oldest open node next
        const BREADTHFIRST = 4096 => "NODE_BREADTHFIRSTMODE";
    }
}

option_set! {
    /// Improvement steps performed by the simplex driver
    pub struct ImproveModes {
        /// re-invert and recompute the final solution
        const SOLUTION = 1 => "IMPROVE_SOLUTION";
        /// flip boxed variables to reach dual feasibility before dual simplex
        const DUALFEAS = 2 => "IMPROVE_DUALFEAS";
    }
}

option_set! {
    /// Anti-degeneracy rules
    pub struct AntiDegenModes {
        const NONE = 0 => "ANTIDEGEN_NONE";
        /// perturb when the objective stalls
        const STALLING = 4 => "ANTIDEGEN_STALLING";
        /// perturb after recovering from a numerical failure
        const NUMFAILURE = 8 => "ANTIDEGEN_NUMFAILURE";
        /// allow perturbation inside branch-and-bound nodes
        const DURINGBB = 128 => "ANTIDEGEN_DURINGBB";
    }
}

option_set! {
    /// Events reported through the message callback
    pub struct MsgMask {
        const PRESOLVE = 1 => "MSG_PRESOLVE";
        const LPFEASIBLE = 8 => "MSG_LPFEASIBLE";
        const LPOPTIMAL = 16 => "MSG_LPOPTIMAL";
        const MILPFEASIBLE = 128 => "MSG_MILPFEASIBLE";
        const MILPEQUAL = 256 => "MSG_MILPEQUAL";
        const MILPBETTER = 512 => "MSG_MILPBETTER";
    }
}

// ---------------------------------
// enumerated types
// ---------------------------------

macro_rules! coded_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$inner:meta])*
                $variant:ident = $code:expr => $label:literal,
            )*
        }
    ) => {
        $(#[$outer])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum $name {
            $(
                $(#[$inner])*
                $variant,
            )*
        }

        impl $name {
            /// numeric code of this value
            pub const fn code(self) -> i32 {
                match self {
                    $(Self::$variant => $code,)*
                }
            }

            /// value with numeric code `code`
            pub fn from_code(code: i32) -> Option<Self> {
                match code {
                    $(c if c == $code => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// symbolic name of this value
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)*
                }
            }

            /// value with symbolic name `name` (case insensitive)
            pub fn from_name(name: &str) -> Option<Self> {
                $(
                    if name.eq_ignore_ascii_case($label) {
                        return Some(Self::$variant);
                    }
                )*
                None
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.name())
            }
        }
    };
}

coded_enum! {
    /// Print levels.   A message is printed when its level is no
    /// greater than the configured verbosity.
    #[derive(Default)]
    pub enum Verbosity {
        Neutral = 0 => "NEUTRAL",
        #[default]
        Critical = 1 => "CRITICAL",
        Severe = 2 => "SEVERE",
        Important = 3 => "IMPORTANT",
        Normal = 4 => "NORMAL",
        Detailed = 5 => "DETAILED",
        Full = 6 => "FULL",
    }
}

coded_enum! {
    /// Simplex variants used for phase 1 and phase 2
    #[derive(Default)]
    pub enum SimplexType {
        PrimalPrimal = 5 => "SIMPLEX_PRIMAL_PRIMAL",
        #[default]
        DualPrimal = 6 => "SIMPLEX_DUAL_PRIMAL",
        PrimalDual = 9 => "SIMPLEX_PRIMAL_DUAL",
        DualDual = 10 => "SIMPLEX_DUAL_DUAL",
    }
}

impl SimplexType {
    /// phase 1 is driven by the dual simplex
    pub fn dual_phase1(self) -> bool {
        matches!(self, SimplexType::DualPrimal | SimplexType::DualDual)
    }
    /// phase 2 prefers the dual simplex
    pub fn dual_phase2(self) -> bool {
        matches!(self, SimplexType::PrimalDual | SimplexType::DualDual)
    }
}

coded_enum! {
    /// Pricing rule for choosing entering and leaving variables
    #[derive(Default)]
    pub enum PivotRule {
        /// Bland's first index rule
        FirstIndex = 0 => "PRICER_FIRSTINDEX",
        Dantzig = 1 => "PRICER_DANTZIG",
        #[default]
        Devex = 2 => "PRICER_DEVEX",
        SteepestEdge = 3 => "PRICER_STEEPESTEDGE",
    }
}

coded_enum! {
    /// Scaling algorithm applied before the simplex
    #[derive(Default)]
    pub enum ScaleAlgorithm {
        None = 0 => "SCALE_NONE",
        Extreme = 1 => "SCALE_EXTREME",
        Range = 2 => "SCALE_RANGE",
        Mean = 3 => "SCALE_MEAN",
        #[default]
        Geometric = 4 => "SCALE_GEOMETRIC",
        CurtisReid = 7 => "SCALE_CURTISREID",
    }
}

coded_enum! {
    /// Which child of a branch is explored first
    #[derive(Default)]
    pub enum BranchMode {
        Floor = 0 => "BRANCH_FLOOR",
        #[default]
        Ceiling = 1 => "BRANCH_CEILING",
        Automatic = 2 => "BRANCH_AUTOMATIC",
        /// use the model wide setting (per column only)
        Default = 3 => "BRANCH_DEFAULT",
    }
}

coded_enum! {
    /// Rule for choosing the variable to branch on
    #[derive(Default)]
    pub enum NodeRule {
        /// lowest indexed non-integer column
        #[default]
        FirstSelect = 0 => "NODE_FIRSTSELECT",
        /// largest gap to the bounds
        GapSelect = 1 => "NODE_GAPSELECT",
        /// largest bound range
        RangeSelect = 2 => "NODE_RANGESELECT",
        /// largest fractional part
        FractionSelect = 3 => "NODE_FRACTIONSELECT",
        /// largest pseudo-cost
        PseudoCostSelect = 4 => "NODE_PSEUDOCOSTSELECT",
        /// largest pseudo-cost weighted by fractionality
        PseudoNonIntSelect = 5 => "NODE_PSEUDONONINTSELECT",
        /// largest ratio of up and down pseudo-costs
        PseudoRatioSelect = 6 => "NODE_PSEUDORATIOSELECT",
        /// the node selector callback decides
        UserSelect = 7 => "NODE_USERSELECT",
    }
}

coded_enum! {
    /// Constraint operator
    #[derive(Default)]
    pub enum ConstraintType {
        Free = 0 => "FR",
        #[default]
        Le = 1 => "LE",
        Ge = 2 => "GE",
        Eq = 3 => "EQ",
    }
}

#[test]
fn test_option_sets() {
    let mut modes = PivotModes::ADAPTIVE | PivotModes::PARTIAL;
    assert!(modes.contains(PivotModes::ADAPTIVE));
    assert!(!modes.contains(PivotModes::RANDOMIZE));
    assert_eq!(modes.bits(), 48);
    assert_eq!(modes.names(), vec!["PRICE_PARTIAL", "PRICE_ADAPTIVE"]);

    modes.remove(PivotModes::PARTIAL);
    assert_eq!(modes, PivotModes::ADAPTIVE);

    assert_eq!(PresolveModes::empty().names(), vec!["PRESOLVE_NONE"]);
    assert!(PresolveModes::from_bits(3).is_some());
    assert!(PresolveModes::from_bits(1 << 30).is_none());
    assert_eq!(
        ScaleModes::from_name("scale_integers"),
        Some(ScaleModes::INTEGERS)
    );
    let presolve = PresolveModes::ROWS | PresolveModes::SENSDUALS;
    assert_eq!(presolve.reductions(), PresolveModes::ROWS);
}

#[test]
fn test_coded_enums() {
    assert_eq!(SimplexType::default().code(), 6);
    assert_eq!(BranchMode::from_code(0), Some(BranchMode::Floor));
    assert_eq!(
        NodeRule::from_name("NODE_PSEUDORATIOSELECT"),
        Some(NodeRule::PseudoRatioSelect)
    );
    assert_eq!(ScaleAlgorithm::CurtisReid.code(), 7);
    assert!(Verbosity::Normal > Verbosity::Critical);
    assert_eq!(ConstraintType::Ge.to_string(), "GE");
}
