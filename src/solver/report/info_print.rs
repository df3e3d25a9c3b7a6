use super::SolutionReport;
use crate::solver::core::context::{report, SolveContext};
use crate::solver::core::*;
use crate::solver::model::{Model, ProblemData};
use crate::timers::Timers;
use std::time::Duration;

const RULE: &str = "-------------------------------------------------------------";

pub(crate) fn print_banner(ctx: &mut SolveContext) {
    if !ctx.is_verbose(Verbosity::Normal) {
        return;
    }
    report!(ctx, Verbosity::Normal, "{}", RULE);
    report!(
        ctx,
        Verbosity::Normal,
        "           lpsolve v{}  -  LP/MILP simplex solver",
        crate::VERSION
    );
    report!(ctx, Verbosity::Normal, "{}", RULE);
}

pub(crate) fn print_configuration(ctx: &mut SolveContext, model: &Model, data: &ProblemData) {
    if !ctx.is_verbose(Verbosity::Normal) {
        return;
    }
    let set = &model.settings;

    let count = |flags: &[bool]| flags.iter().filter(|&&b| b).count();
    let name = model.get_lp_name();

    report!(ctx, Verbosity::Normal, "");
    if !name.is_empty() {
        report!(ctx, Verbosity::Normal, "model: {}", name);
    }
    report!(ctx, Verbosity::Normal, "problem:");
    report!(
        ctx,
        Verbosity::Normal,
        "  sense         = {}",
        if model.maximize { "maximize" } else { "minimize" }
    );
    report!(ctx, Verbosity::Normal, "  columns       = {}", data.n);
    report!(ctx, Verbosity::Normal, "  rows          = {}", data.m);
    report!(ctx, Verbosity::Normal, "  nnz(A)        = {}", data.a.nnz());
    let integers = count(&data.integer);
    let semicont = count(&data.semicont);
    if integers + semicont + data.sos.len() > 0 {
        report!(
            ctx,
            Verbosity::Normal,
            "  integers = {}, semi-continuous = {}, SOS = {}",
            integers,
            semicont,
            data.sos.len()
        );
    }

    report!(ctx, Verbosity::Normal, "");
    report!(ctx, Verbosity::Normal, "settings:");
    report!(
        ctx,
        Verbosity::Normal,
        "  simplex = {}, pricing = {} ({})",
        set.simplex_type,
        set.pivot_rule,
        set.pivot_modes.names().join(" + ")
    );
    let timeout = match set.timeout {
        0 => "Inf".to_string(),
        t => format!("{:?}", Duration::from_secs(t)),
    };
    report!(
        ctx,
        Verbosity::Normal,
        "  time limit = {}, max pivot = {}, infinity = {:.0e}",
        timeout,
        set.max_pivot,
        set.infinity
    );
    report!(
        ctx,
        Verbosity::Normal,
        "  eps_primal = {:.1e}, eps_dual = {:.1e}, eps_pivot = {:.1e}, eps_int = {:.1e}",
        set.epsilon_primal,
        set.epsilon_dual,
        set.epsilon_pivot,
        set.epsilon_int
    );
    report!(
        ctx,
        Verbosity::Normal,
        "  scaling = {} ({}), presolve = {}",
        set.scale_algorithm,
        set.scale_modes.names().join(" + "),
        set.presolve.names().join(" + ")
    );
    if data.has_discrete() {
        report!(
            ctx,
            Verbosity::Normal,
            "  floor first = {}, node rule = {}, depth limit = {}",
            set.floor_first,
            set.node_rule,
            set.depth_limit
        );
        report!(
            ctx,
            Verbosity::Normal,
            "  mip gap abs = {:.1e}, mip gap rel = {:.1e}, solution limit = {}",
            set.mip_gap_abs,
            set.mip_gap_rel,
            set.solution_limit
        );
    }
    report!(ctx, Verbosity::Normal, "");
}

pub(crate) fn print_footer(ctx: &mut SolveContext, solution: &SolutionReport) {
    if !ctx.is_verbose(Verbosity::Normal) {
        return;
    }
    report!(ctx, Verbosity::Normal, "{}", RULE);
    report!(
        ctx,
        Verbosity::Normal,
        "Terminated with status = {}",
        solution.status
    );
    if solution.has_solution() {
        report!(
            ctx,
            Verbosity::Normal,
            "objective = {}",
            format_g(solution.objective, 12)
        );
    }
    report!(
        ctx,
        Verbosity::Normal,
        "iterations = {}, nodes = {}",
        solution.iterations,
        solution.nodes
    );
    report!(
        ctx,
        Verbosity::Normal,
        "solve time = {:?}",
        Duration::from_secs_f64(solution.solve_time.max(0.0))
    );
}

pub(crate) fn print_timers(ctx: &mut SolveContext, timers: &Timers) {
    if !ctx.is_verbose(Verbosity::Full) {
        return;
    }
    let mut buffer = Vec::new();
    if timers.print(&mut buffer).is_err() {
        return;
    }
    report!(ctx, Verbosity::Full, "timers:");
    for line in String::from_utf8_lossy(&buffer).lines() {
        report!(ctx, Verbosity::Full, "{}", line);
    }
}

/// Format `value` with `digits` significant digits the way C's `%g` does:
/// fixed notation for moderate exponents, scientific otherwise, trailing
/// zeros removed.
pub(crate) fn format_g(value: f64, digits: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return format!("{}", value);
    }
    let digits = digits.max(1);
    let sci = format!("{:.*e}", digits - 1, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some(parts) => parts,
        None => return sci,
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= digits as i32 {
        let mantissa = trim_zeros(mantissa.to_string());
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exp.abs())
    } else {
        let decimals = (digits as i32 - 1 - exp).max(0) as usize;
        trim_zeros(format!("{:.*}", decimals, value))
    }
}

fn trim_zeros(s: String) -> String {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[test]
fn test_format_g() {
    assert_eq!(format_g(0.0, 6), "0");
    assert_eq!(format_g(6315.6251, 6), "6315.63");
    assert_eq!(format_g(6315.625, 12), "6315.625");
    assert_eq!(format_g(-2.5, 6), "-2.5");
    assert_eq!(format_g(1e30, 6), "1e+30");
    assert_eq!(format_g(1.5e-7, 6), "1.5e-07");
    assert_eq!(format_g(1234567.0, 6), "1.23457e+06");
    assert_eq!(format_g(0.0001, 6), "0.0001");
    assert_eq!(format_g(22.0, 6), "22");
}
