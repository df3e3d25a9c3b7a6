use super::info_print::format_g;
use crate::solver::model::Model;
use std::io::{Result, Write};

impl Model {
    /// Write the objective value of the last solve to the print target.
    pub fn print_objective(&mut self) -> Result<()> {
        let value = self.solution.objective;
        writeln!(self.stream, "\nValue of objective function: {:.8}", clean(value))?;
        self.stream.flush()
    }

    /// Write the column values of the last solve, `columns` entries per
    /// line.
    pub fn print_solution(&mut self, columns: usize) -> Result<()> {
        let names: Vec<String> = (0..self.columns()).map(|j| self.col_name(j)).collect();
        let values = self.solution.variables.clone();

        writeln!(self.stream, "\nActual values of the variables:")?;
        self.print_table(&names, &values, columns)
    }

    /// Write the row activities of the last solve, `columns` entries per
    /// line.
    pub fn print_constraints(&mut self, columns: usize) -> Result<()> {
        let names: Vec<String> = (0..self.rows()).map(|i| self.row_name(i)).collect();
        let values = self.solution.constraints.clone();

        writeln!(self.stream, "\nActual values of the constraints:")?;
        self.print_table(&names, &values, columns)
    }

    /// Write dual values and reduced costs of the last solve, followed by
    /// the ranging information when it was computed.   Nothing is written
    /// for a solve that did not request duals.
    pub fn print_duals(&mut self) -> Result<()> {
        let solution = &self.solution;
        let (Some(duals), Some(reduced)) = (&solution.duals, &solution.reduced_costs) else {
            return Ok(());
        };
        let row_names: Vec<String> = (0..self.rows()).map(|i| self.row_name(i)).collect();
        let col_names: Vec<String> = (0..self.columns()).map(|j| self.col_name(j)).collect();
        let (duals, reduced) = (duals.clone(), reduced.clone());
        let sensitivity = solution.sensitivity.clone();
        let out = &mut self.stream;

        writeln!(out, "\nDual value")?;
        match sensitivity {
            None => {
                for (name, y) in row_names.iter().zip(duals.iter()) {
                    writeln!(out, "{:<20} {:>15}", name, format_g(clean(*y), 7))?;
                }
                for (name, d) in col_names.iter().zip(reduced.iter()) {
                    writeln!(out, "{:<20} {:>15}", name, format_g(clean(*d), 7))?;
                }
            }
            Some(s) => {
                writeln!(
                    out,
                    "{:<20} {:>15} {:>15} {:>15}",
                    "", "value", "from", "till"
                )?;
                for (i, name) in row_names.iter().enumerate() {
                    writeln!(
                        out,
                        "{:<20} {:>15} {:>15} {:>15}",
                        name,
                        format_g(clean(duals[i]), 7),
                        format_g(clean(s.rhs_from[i]), 7),
                        format_g(clean(s.rhs_till[i]), 7)
                    )?;
                }
                for (j, name) in col_names.iter().enumerate() {
                    writeln!(
                        out,
                        "{:<20} {:>15} {:>15} {:>15}",
                        name,
                        format_g(clean(reduced[j]), 7),
                        format_g(clean(s.value_from[j]), 7),
                        format_g(clean(s.value_till[j]), 7)
                    )?;
                }

                writeln!(out, "\nPrimal objective:")?;
                writeln!(
                    out,
                    "{:<20} {:>15} {:>15}",
                    "Column name", "From", "Till"
                )?;
                for (j, name) in col_names.iter().enumerate() {
                    writeln!(
                        out,
                        "{:<20} {:>15} {:>15}",
                        name,
                        format_g(clean(s.objective_from[j]), 7),
                        format_g(clean(s.objective_till[j]), 7)
                    )?;
                }
            }
        }
        out.flush()
    }

    fn print_table(&mut self, names: &[String], values: &[f64], columns: usize) -> Result<()> {
        let columns = columns.max(1);
        let out = &mut self.stream;
        for (k, (name, v)) in names.iter().zip(values.iter()).enumerate() {
            write!(out, "{:<20} {:>12}", name, format_g(clean(*v), 6))?;
            if (k + 1) % columns == 0 {
                writeln!(out)?;
            } else {
                write!(out, "       ")?;
            }
        }
        if values.len() % columns != 0 {
            writeln!(out)?;
        }
        out.flush()
    }
}

// avoid printing "-0"
fn clean(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use crate::io::ConfigurablePrintTarget;
    use crate::solver::*;

    fn solved_model() -> Model {
        let mut model = Model::new(0, 2).unwrap();
        model.set_maxim();
        model.set_obj_fn(&[143., 60.]).unwrap();
        model.add_constraint(&[120., 210.], ConstraintType::Le, 15000.).unwrap();
        model.add_constraint(&[110., 30.], ConstraintType::Le, 4000.).unwrap();
        model.add_constraint(&[1., 1.], ConstraintType::Le, 75.).unwrap();
        model.set_col_name(1, "x").unwrap();
        model.set_col_name(2, "y").unwrap();
        model.print_to_buffer();
        assert_eq!(model.solve(), SolverStatus::Optimal);
        model
    }

    #[test]
    fn test_print_values() {
        let mut model = solved_model();
        model.print_objective().unwrap();
        model.print_solution(1).unwrap();
        model.print_constraints(1).unwrap();

        let text = model.get_print_buffer().unwrap();
        assert!(text.contains("Value of objective function: 6315.62500000"));
        assert!(text.contains("Actual values of the variables:"));
        assert!(text.lines().any(|l| l.starts_with("x") && l.ends_with("21.875")));
        assert!(text.lines().any(|l| l.starts_with("R3") && l.ends_with("75")));
    }

    #[test]
    fn test_print_duals_requires_request() {
        let mut model = solved_model();
        model.print_duals().unwrap();
        assert!(!model.get_print_buffer().unwrap().contains("Dual value"));

        model.settings_mut().presolve = PresolveModes::DUALS;
        model.print_to_buffer();
        model.solve();
        model.print_duals().unwrap();
        let text = model.get_print_buffer().unwrap();
        assert!(text.contains("Dual value"));
        assert!(text.lines().any(|l| l.starts_with("R2") && l.ends_with("1.0375")));
    }
}
