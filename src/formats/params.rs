//! Parameter files.
//!
//! Settings are stored in ini style sections of `Key=Value` lines:
//!
//! ```text
//! [Default]
//! Epsilon=1e-12
//! Infinity=1e+30
//! MipGapAbs=1e-11
//! MipGapRel=1e-09
//! Pivoting=PRICER_DEVEX + PRICE_ADAPTIVE
//! ```
//!
//! Keys are case insensitive and lines starting with `;` or `#` are
//! comments.   Flag valued parameters take symbolic names joined with `+`,
//! numeric values or a mix of both.

use super::ParamsError;
use crate::solver::core::*;
use crate::solver::model::Model;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

const DEFAULT_SECTION: &str = "Default";

// low bits of the combined values that hold the enumerated part
const PIVOT_RULE_MASK: u32 = 0x0F;
const SCALE_ALGORITHM_MASK: u32 = 0x1F;
const NODE_RULE_MASK: u32 = 0x07;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Epsilon,
    Infinity,
    MipGapAbs,
    MipGapRel,
    Verbose,
    Timeout,
    EpsPrimal,
    EpsDual,
    EpsPivot,
    EpsInt,
    EpsPerturb,
    BreakNumericAccuracy,
    MaxPivot,
    SimplexType,
    Pivoting,
    Improve,
    AntiDegen,
    Scaling,
    ScaleLimit,
    Presolve,
    PresolveLoops,
    FloorFirst,
    NodeRule,
    DepthLimit,
    SolutionLimit,
    BreakAtFirst,
    BreakAtValue,
    ObjBound,
}

impl Key {
    const ALL: [Key; 28] = [
        Key::Epsilon,
        Key::Infinity,
        Key::MipGapAbs,
        Key::MipGapRel,
        Key::Verbose,
        Key::Timeout,
        Key::EpsPrimal,
        Key::EpsDual,
        Key::EpsPivot,
        Key::EpsInt,
        Key::EpsPerturb,
        Key::BreakNumericAccuracy,
        Key::MaxPivot,
        Key::SimplexType,
        Key::Pivoting,
        Key::Improve,
        Key::AntiDegen,
        Key::Scaling,
        Key::ScaleLimit,
        Key::Presolve,
        Key::PresolveLoops,
        Key::FloorFirst,
        Key::NodeRule,
        Key::DepthLimit,
        Key::SolutionLimit,
        Key::BreakAtFirst,
        Key::BreakAtValue,
        Key::ObjBound,
    ];

    fn name(self) -> &'static str {
        match self {
            Key::Epsilon => "Epsilon",
            Key::Infinity => "Infinity",
            Key::MipGapAbs => "MipGapAbs",
            Key::MipGapRel => "MipGapRel",
            Key::Verbose => "Verbose",
            Key::Timeout => "Timeout",
            Key::EpsPrimal => "EpsPrimal",
            Key::EpsDual => "EpsDual",
            Key::EpsPivot => "EpsPivot",
            Key::EpsInt => "EpsInt",
            Key::EpsPerturb => "EpsPerturb",
            Key::BreakNumericAccuracy => "BreakNumericAccuracy",
            Key::MaxPivot => "MaxPivot",
            Key::SimplexType => "SimplexType",
            Key::Pivoting => "Pivoting",
            Key::Improve => "Improve",
            Key::AntiDegen => "AntiDegen",
            Key::Scaling => "Scaling",
            Key::ScaleLimit => "ScaleLimit",
            Key::Presolve => "Presolve",
            Key::PresolveLoops => "PresolveLoops",
            Key::FloorFirst => "FloorFirst",
            Key::NodeRule => "NodeRule",
            Key::DepthLimit => "DepthLimit",
            Key::SolutionLimit => "SolutionLimit",
            Key::BreakAtFirst => "BreakAtFirst",
            Key::BreakAtValue => "BreakAtValue",
            Key::ObjBound => "ObjBound",
        }
    }

    fn from_name(name: &str) -> Option<Key> {
        Key::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(name))
    }
}

// ---------------------------------
// value formatting
// ---------------------------------

fn float_text(v: f64) -> String {
    let short = crate::solver::report::info_print::format_g(v, 12);
    if short.parse::<f64>().ok() == Some(v) {
        short
    } else {
        format!("{:e}", v)
    }
}

fn flags_text(names: Vec<&'static str>, bits: u32) -> String {
    if names.is_empty() {
        bits.to_string()
    } else {
        names.join(" + ")
    }
}

// an enumerated value combined with a set of modes: "RULE + MODE + ..."
fn combined_text(rule: &'static str, modes: Vec<&'static str>) -> String {
    std::iter::once(rule)
        .chain(modes)
        .collect::<Vec<_>>()
        .join(" + ")
}

fn value_text(key: Key, s: &SolverSettings) -> String {
    match key {
        Key::Epsilon => float_text(s.epsilon_value),
        Key::Infinity => float_text(s.infinity),
        Key::MipGapAbs => float_text(s.mip_gap_abs),
        Key::MipGapRel => float_text(s.mip_gap_rel),
        Key::Verbose => s.verbose.name().to_string(),
        Key::Timeout => s.timeout.to_string(),
        Key::EpsPrimal => float_text(s.epsilon_primal),
        Key::EpsDual => float_text(s.epsilon_dual),
        Key::EpsPivot => float_text(s.epsilon_pivot),
        Key::EpsInt => float_text(s.epsilon_int),
        Key::EpsPerturb => float_text(s.epsilon_perturb),
        Key::BreakNumericAccuracy => float_text(s.break_numeric_accuracy),
        Key::MaxPivot => s.max_pivot.to_string(),
        Key::SimplexType => s.simplex_type.name().to_string(),
        Key::Pivoting => combined_text(
            s.pivot_rule.name(),
            non_zero_names(s.pivot_modes.names(), s.pivot_modes.bits()),
        ),
        Key::Improve => flags_text(s.improve.names(), s.improve.bits()),
        Key::AntiDegen => flags_text(s.anti_degen.names(), s.anti_degen.bits()),
        Key::Scaling => combined_text(
            s.scale_algorithm.name(),
            non_zero_names(s.scale_modes.names(), s.scale_modes.bits()),
        ),
        Key::ScaleLimit => float_text(s.scale_limit),
        Key::Presolve => flags_text(s.presolve.names(), s.presolve.bits()),
        Key::PresolveLoops => s.presolve_loops.to_string(),
        Key::FloorFirst => s.floor_first.name().to_string(),
        Key::NodeRule => combined_text(
            s.node_rule.name(),
            non_zero_names(s.node_modes.names(), s.node_modes.bits()),
        ),
        Key::DepthLimit => s.depth_limit.to_string(),
        Key::SolutionLimit => s.solution_limit.to_string(),
        Key::BreakAtFirst => (s.break_at_first as u8).to_string(),
        Key::BreakAtValue => float_text(s.break_at_value.unwrap_or(-s.infinity)),
        Key::ObjBound => float_text(s.objective_bound.unwrap_or(s.infinity)),
    }
}

// the modes part of a combined value is left out when empty
fn non_zero_names(names: Vec<&'static str>, bits: u32) -> Vec<&'static str> {
    if bits == 0 {
        Vec::new()
    } else {
        names
    }
}

// ---------------------------------
// value parsing
// ---------------------------------

struct ValueParser<'a> {
    line: usize,
    key: &'a str,
    value: &'a str,
}

impl<'a> ValueParser<'a> {
    fn bad(&self) -> ParamsError {
        ParamsError::BadValue {
            line: self.line,
            key: self.key.to_string(),
            value: self.value.to_string(),
        }
    }

    fn float(&self) -> Result<f64, ParamsError> {
        self.value.parse::<f64>().map_err(|_| self.bad())
    }

    fn integer<T: std::str::FromStr>(&self) -> Result<T, ParamsError> {
        // integers are sometimes written as floats, e.g. "250.0"
        if let Ok(v) = self.value.parse::<T>() {
            return Ok(v);
        }
        let v = self.float()?;
        if v.fract() != 0.0 {
            return Err(self.bad());
        }
        format!("{}", v).parse::<T>().map_err(|_| self.bad())
    }

    // sum of the parts of "A + B + 16", each part being a number or a
    // name resolved by `lookup`
    fn flags(&self, lookup: impl Fn(&str) -> Option<u32>) -> Result<u32, ParamsError> {
        let mut total = 0;
        for part in self.value.split('+').map(str::trim) {
            if part.is_empty() {
                return Err(self.bad());
            }
            let bits = match part.parse::<u32>() {
                Ok(v) => v,
                Err(_) => lookup(part).ok_or_else(|| self.bad())?,
            };
            total |= bits;
        }
        Ok(total)
    }

    fn coded<T>(
        &self,
        from_name: impl Fn(&str) -> Option<T>,
        from_code: impl Fn(i32) -> Option<T>,
    ) -> Result<T, ParamsError> {
        let parsed = match self.value.parse::<i32>() {
            Ok(code) => from_code(code),
            Err(_) => from_name(self.value),
        };
        parsed.ok_or_else(|| self.bad())
    }

    fn option_set<T>(
        &self,
        from_name: impl Fn(&str) -> Option<T>,
        bits_of: impl Fn(T) -> u32,
        from_bits: impl Fn(u32) -> Option<T>,
    ) -> Result<T, ParamsError> {
        let bits = self.flags(|name| from_name(name).map(&bits_of))?;
        from_bits(bits).ok_or_else(|| self.bad())
    }
}

fn apply(
    key: Key,
    parser: &ValueParser,
    s: &mut SolverSettings,
) -> Result<(), ParamsError> {
    match key {
        Key::Epsilon => s.epsilon_value = parser.float()?,
        Key::Infinity => s.infinity = parser.float()?,
        Key::MipGapAbs => s.mip_gap_abs = parser.float()?,
        Key::MipGapRel => s.mip_gap_rel = parser.float()?,
        Key::Verbose => s.verbose = parser.coded(Verbosity::from_name, Verbosity::from_code)?,
        Key::Timeout => s.timeout = parser.integer()?,
        Key::EpsPrimal => s.epsilon_primal = parser.float()?,
        Key::EpsDual => s.epsilon_dual = parser.float()?,
        Key::EpsPivot => s.epsilon_pivot = parser.float()?,
        Key::EpsInt => s.epsilon_int = parser.float()?,
        Key::EpsPerturb => s.epsilon_perturb = parser.float()?,
        Key::BreakNumericAccuracy => s.break_numeric_accuracy = parser.float()?,
        Key::MaxPivot => s.max_pivot = parser.integer()?,
        Key::SimplexType => {
            s.simplex_type = parser.coded(SimplexType::from_name, SimplexType::from_code)?
        }
        Key::Pivoting => {
            let bits = parser.flags(|name| {
                PivotRule::from_name(name)
                    .map(|r| r.code() as u32)
                    .or_else(|| PivotModes::from_name(name).map(PivotModes::bits))
            })?;
            s.pivot_rule = PivotRule::from_code((bits & PIVOT_RULE_MASK) as i32)
                .ok_or_else(|| parser.bad())?;
            s.pivot_modes =
                PivotModes::from_bits(bits & !PIVOT_RULE_MASK).ok_or_else(|| parser.bad())?;
        }
        Key::Improve => {
            s.improve = parser.option_set(
                ImproveModes::from_name,
                ImproveModes::bits,
                ImproveModes::from_bits,
            )?
        }
        Key::AntiDegen => {
            s.anti_degen = parser.option_set(
                AntiDegenModes::from_name,
                AntiDegenModes::bits,
                AntiDegenModes::from_bits,
            )?
        }
        Key::Scaling => {
            let bits = parser.flags(|name| {
                ScaleAlgorithm::from_name(name)
                    .map(|a| a.code() as u32)
                    .or_else(|| ScaleModes::from_name(name).map(ScaleModes::bits))
            })?;
            s.scale_algorithm = ScaleAlgorithm::from_code((bits & SCALE_ALGORITHM_MASK) as i32)
                .ok_or_else(|| parser.bad())?;
            s.scale_modes =
                ScaleModes::from_bits(bits & !SCALE_ALGORITHM_MASK).ok_or_else(|| parser.bad())?;
        }
        Key::ScaleLimit => s.scale_limit = parser.float()?,
        Key::Presolve => {
            s.presolve = parser.option_set(
                PresolveModes::from_name,
                PresolveModes::bits,
                PresolveModes::from_bits,
            )?
        }
        Key::PresolveLoops => s.presolve_loops = parser.integer()?,
        Key::FloorFirst => {
            s.floor_first = parser.coded(BranchMode::from_name, BranchMode::from_code)?
        }
        Key::NodeRule => {
            let bits = parser.flags(|name| {
                NodeRule::from_name(name)
                    .map(|r| r.code() as u32)
                    .or_else(|| NodeModes::from_name(name).map(NodeModes::bits))
            })?;
            s.node_rule = NodeRule::from_code((bits & NODE_RULE_MASK) as i32)
                .ok_or_else(|| parser.bad())?;
            s.node_modes =
                NodeModes::from_bits(bits & !NODE_RULE_MASK).ok_or_else(|| parser.bad())?;
        }
        Key::DepthLimit => s.depth_limit = parser.integer()?,
        Key::SolutionLimit => s.solution_limit = parser.integer()?,
        Key::BreakAtFirst => {
            s.break_at_first = match parser.integer::<i64>()? {
                0 => false,
                1 => true,
                _ => return Err(parser.bad()),
            }
        }
        Key::BreakAtValue => {
            let v = parser.float()?;
            s.break_at_value = (v.abs() < s.infinity).then_some(v);
        }
        Key::ObjBound => {
            let v = parser.float()?;
            s.objective_bound = (v.abs() < s.infinity).then_some(v);
        }
    }
    Ok(())
}

/// Read the parameters of `[section]` into `settings`.   Parameters the
/// file does not mention keep their current value.   The result is
/// validated before it is stored, so `settings` is left unchanged by a
/// failing read.
pub fn read_settings<R: BufRead>(
    reader: R,
    section: &str,
    settings: &mut SolverSettings,
) -> Result<(), ParamsError> {
    let mut updated = settings.clone();
    let mut in_section = false;
    let mut found = false;

    for (k, line) in reader.lines().enumerate() {
        let line = line?;
        let number = k + 1;
        let text = line.trim();
        if text.is_empty() || text.starts_with(';') || text.starts_with('#') {
            continue;
        }

        if let Some(rest) = text.strip_prefix('[') {
            let name = rest.strip_suffix(']').ok_or_else(|| ParamsError::Syntax {
                line: number,
                message: "unterminated section header".to_string(),
            })?;
            in_section = name.trim().eq_ignore_ascii_case(section);
            found |= in_section;
            continue;
        }
        if !in_section {
            continue;
        }

        let (key, value) = text.split_once('=').ok_or_else(|| ParamsError::Syntax {
            line: number,
            message: "expected Key=Value".to_string(),
        })?;
        let (key, value) = (key.trim(), value.trim());
        let parsed = Key::from_name(key).ok_or_else(|| ParamsError::UnknownKey {
            line: number,
            key: key.to_string(),
        })?;
        let parser = ValueParser {
            line: number,
            key,
            value,
        };
        apply(parsed, &parser, &mut updated)?;
    }

    if !found {
        return Err(ParamsError::MissingSection(section.to_string()));
    }
    updated.validate()?;
    *settings = updated;
    Ok(())
}

/// Write every parameter of `settings` as section `[section]`.
pub fn write_settings<W: Write>(
    mut writer: W,
    section: &str,
    settings: &SolverSettings,
) -> io::Result<()> {
    writeln!(writer, "[{}]", section)?;
    for key in Key::ALL {
        writeln!(writer, "{}={}", key.name(), value_text(key, settings))?;
    }
    writer.flush()
}

impl Model {
    /// Read the `[Default]` section of parameter file `path` into the
    /// model settings.
    pub fn read_params<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ParamsError> {
        let file = File::open(path)?;
        read_settings(BufReader::new(file), DEFAULT_SECTION, &mut self.settings)
    }

    /// Write the model settings to parameter file `path` as section
    /// `[Default]`.
    pub fn write_params<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = BufWriter::new(File::create(path)?);
        write_settings(file, DEFAULT_SECTION, &self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_text(settings: &SolverSettings) -> String {
        let mut out = Vec::new();
        write_settings(&mut out, "Default", settings).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_default_text() {
        let text = write_text(&SolverSettings::default());
        assert!(text.starts_with("[Default]\n"));
        assert!(text.contains("\nInfinity=1e+30\n"));
        assert!(text.contains("\nPivoting=PRICER_DEVEX + PRICE_ADAPTIVE\n"));
        assert!(text.contains("\nScaling=SCALE_GEOMETRIC + SCALE_EQUILIBRATE + SCALE_INTEGERS\n"));
        assert!(text.contains("\nPresolve=PRESOLVE_NONE\n"));
        assert!(text.contains("\nNodeRule=NODE_FIRSTSELECT\n"));
        assert!(text.contains("\nBreakAtValue=-1e+30\n"));
        assert!(text.contains("\nObjBound=1e+30\n"));
        assert_eq!(text.lines().count(), 1 + Key::ALL.len());
    }

    #[test]
    fn test_round_trip() {
        let mut settings = SolverSettings::default();
        settings.epsilon_value = 1e-11;
        settings.mip_gap_abs = 1e-8;
        settings.mip_gap_rel = 0.1 + 0.2;
        settings.verbose = Verbosity::Detailed;
        settings.timeout = 60;
        settings.epsilon_pivot = 1e-8;
        settings.max_pivot = 100;
        settings.simplex_type = SimplexType::PrimalPrimal;
        settings.pivot_rule = PivotRule::SteepestEdge;
        settings.pivot_modes = PivotModes::PARTIAL | PivotModes::HARRISTWOPASS;
        settings.improve = ImproveModes::empty();
        settings.anti_degen = AntiDegenModes::NONE;
        settings.scale_algorithm = ScaleAlgorithm::CurtisReid;
        settings.scale_modes = ScaleModes::POWER2;
        settings.presolve = PresolveModes::ROWS | PresolveModes::COLS | PresolveModes::DUALS;
        settings.presolve_loops = 3;
        settings.floor_first = BranchMode::Automatic;
        settings.node_rule = NodeRule::PseudoRatioSelect;
        settings.node_modes = NodeModes::DEPTHFIRST | NodeModes::RANDOMIZE;
        settings.depth_limit = 20;
        settings.solution_limit = 3;
        settings.break_at_first = true;
        settings.break_at_value = Some(-12.5);
        settings.objective_bound = Some(1000.0);

        let text = write_text(&settings);
        assert!(text.contains("\nImprove=0\n"));
        let mut copy = SolverSettings::default();
        read_settings(text.as_bytes(), "default", &mut copy).unwrap();
        assert_eq!(copy, settings);
    }

    #[test]
    fn test_read_numeric_and_mixed_values() {
        let text = "; written by hand\n\
                    [Other]\n\
                    Bogus=1\n\
                    [Default]\n\
                    # numeric codes\n\
                    pivoting = 34\n\
                    Scaling=4 + SCALE_POWER2\n\
                    NODERULE=NODE_GAPSELECT + 32\n\
                    Presolve=3\n\
                    MaxPivot=50.0\n\
                    BreakAtValue=-1e30\n\
                    FloorFirst=0\n";
        let mut settings = SolverSettings::default();
        settings.break_at_value = Some(3.0);
        read_settings(text.as_bytes(), "Default", &mut settings).unwrap();
        assert_eq!(settings.pivot_rule, PivotRule::Devex);
        assert_eq!(settings.pivot_modes, PivotModes::ADAPTIVE);
        assert_eq!(settings.scale_algorithm, ScaleAlgorithm::Geometric);
        assert_eq!(settings.scale_modes, ScaleModes::POWER2);
        assert_eq!(settings.node_rule, NodeRule::GapSelect);
        assert_eq!(settings.node_modes, NodeModes::GREEDY);
        assert_eq!(settings.presolve, PresolveModes::ROWS | PresolveModes::COLS);
        assert_eq!(settings.max_pivot, 50);
        assert_eq!(settings.break_at_value, None);
        assert_eq!(settings.floor_first, BranchMode::Floor);
    }

    #[test]
    fn test_read_errors() {
        let mut settings = SolverSettings::default();

        let err = read_settings("[Default]\nMaxIter=3\n".as_bytes(), "Default", &mut settings);
        assert!(matches!(err, Err(ParamsError::UnknownKey { line: 2, .. })));

        let err = read_settings("[Default]\nPivoting=FAST\n".as_bytes(), "Default", &mut settings);
        assert!(matches!(err, Err(ParamsError::BadValue { line: 2, .. })));

        let err = read_settings("[Default]\nTimeout\n".as_bytes(), "Default", &mut settings);
        assert!(matches!(err, Err(ParamsError::Syntax { line: 2, .. })));

        let err = read_settings("[Other]\nTimeout=3\n".as_bytes(), "Default", &mut settings);
        assert!(matches!(err, Err(ParamsError::MissingSection(_))));

        // a failing read leaves the settings untouched
        let err = read_settings(
            "[Default]\nTimeout=3\nEpsPivot=-1\n".as_bytes(),
            "Default",
            &mut settings,
        );
        assert!(matches!(err, Err(ParamsError::Settings(_))));
        assert_eq!(settings, SolverSettings::default());
    }

    #[test]
    fn test_model_params_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.ini");

        let mut model = Model::new(0, 0).unwrap();
        model.settings_mut().epsilon_int = 1e-6;
        model.settings_mut().node_rule = NodeRule::FractionSelect;
        model.write_params(&path).unwrap();

        let mut other = Model::new(0, 0).unwrap();
        other.read_params(&path).unwrap();
        assert_eq!(other.settings(), model.settings());
    }
}
