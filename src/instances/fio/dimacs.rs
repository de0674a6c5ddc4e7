//! # Writing DIMACS WCNF Files
//!
//! The formula is handed to external MaxSAT solvers in one of the two WCNF
//! dialects used by the MaxSAT evaluations.
//!
//! ## References
//!
//! - [DIMACS WCNF pre22](https://maxsat-evaluations.github.io/2017/rules.html#input)
//! - [DIMACS WCNF post22](https://maxsat-evaluations.github.io/2022/rules.html#input)

use std::io::{self, Write};

use crate::{
    instances::{WcnfFormula, Weight},
    types::Clause,
};

/// The WCNF dialect to write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WcnfFormat {
    /// `p wcnf <vars> <clauses> <top>` header, hard clauses carry the top weight
    #[default]
    Pre22,
    /// No header, hard clauses are prefixed with `h`
    Post22,
}

/// Writes a formula to a DIMACS WCNF file
///
/// # Errors
///
/// If writing fails
pub fn write_wcnf_annotated<W: Write>(
    writer: &mut W,
    formula: &WcnfFormula,
    format: WcnfFormat,
) -> Result<(), io::Error> {
    writeln!(writer, "c WCNF file written by satreduce")?;
    match format {
        WcnfFormat::Pre22 => {
            let top = formula.top();
            writeln!(
                writer,
                "p wcnf {} {} {}",
                formula.n_vars(),
                formula.n_clauses(),
                top
            )?;
            formula.iter().try_for_each(|(cl, w)| {
                match w {
                    Weight::Hard => write!(writer, "{top} ")?,
                    Weight::Soft(w) => write!(writer, "{w} ")?,
                }
                write_clause(writer, cl)
            })?;
        }
        WcnfFormat::Post22 => {
            if let Some(mv) = formula.max_var() {
                writeln!(writer, "c highest var: {}", mv.to_ipasir())?;
            }
            writeln!(writer, "c {} hard clauses", formula.n_hard())?;
            writeln!(writer, "c {} soft clauses", formula.n_soft())?;
            formula.iter().try_for_each(|(cl, w)| {
                match w {
                    Weight::Hard => write!(writer, "h ")?,
                    Weight::Soft(w) => write!(writer, "{w} ")?,
                }
                write_clause(writer, cl)
            })?;
        }
    }
    writer.flush()
}

fn write_clause<W: Write>(writer: &mut W, clause: &Clause) -> Result<(), io::Error> {
    clause
        .iter()
        .try_for_each(|l| write!(writer, "{} ", l.to_ipasir()))?;
    writeln!(writer, "0")
}

#[cfg(test)]
mod tests {
    use super::{write_wcnf_annotated, WcnfFormat};
    use crate::{
        clause,
        instances::{WcnfFormula, Weight},
    };

    fn formula() -> WcnfFormula {
        let mut formula = WcnfFormula::new();
        let a = formula.new_var();
        let b = formula.new_var();
        formula
            .add_clauses([clause![a.neg_lit()], clause![b.neg_lit()]], Weight::Soft(2))
            .unwrap();
        formula
            .add_clause(clause![a.pos_lit(), b.pos_lit()], Weight::Hard)
            .unwrap();
        formula
    }

    fn write(format: WcnfFormat) -> String {
        let mut buf = Vec::new();
        write_wcnf_annotated(&mut buf, &formula(), format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn write_pre22() {
        assert_eq!(
            write(WcnfFormat::Pre22),
            "c WCNF file written by satreduce\np wcnf 2 3 5\n2 -1 0\n2 -2 0\n5 1 2 0\n"
        );
    }

    #[test]
    fn write_post22() {
        assert_eq!(
            write(WcnfFormat::Post22),
            "c WCNF file written by satreduce\nc highest var: 2\nc 1 hard clauses\nc 2 soft clauses\n2 -1 0\n2 -2 0\nh 1 2 0\n"
        );
    }

    #[test]
    fn write_empty() {
        let mut buf = Vec::new();
        write_wcnf_annotated(&mut buf, &WcnfFormula::new(), WcnfFormat::Pre22).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "c WCNF file written by satreduce\np wcnf 0 0 1\n"
        );
    }
}
