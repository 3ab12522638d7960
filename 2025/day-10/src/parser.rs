use chumsky::prelude::*;
use itertools::Itertools;
use miette::*;

use crate::machine::{ButtonEffect, Machine, Row};

fn machine<'a>() -> impl Parser<'a, &'a str, Machine, extra::Err<Rich<'a, char>>> {
    // Custom whitespace parser that excludes newlines
    let hspace = one_of(" \t").repeated();

    let index = text::int(10).try_map(|digits: &str, span| {
        digits
            .parse::<usize>()
            .map_err(|e| Rich::custom(span, format!("invalid index {digits}: {e}")))
    });

    let value = text::int(10).try_map(|digits: &str, span| {
        digits
            .parse::<u32>()
            .map_err(|e| Rich::custom(span, format!("invalid counter target {digits}: {e}")))
    });

    let light = choice((just('.').to(false), just('#').to(true)));

    // [.##.]
    let diagram = light
        .repeated()
        .collect::<Vec<bool>>()
        .map(|v| v.into_iter().collect::<Row>())
        .delimited_by(just('['), just(']'));

    // (0,2,3)
    let button = index
        .padded_by(hspace)
        .separated_by(just(','))
        .collect::<Vec<usize>>()
        .delimited_by(just('('), just(')'))
        .map(ButtonEffect::uniform);

    // (0,2) (1,3) ...
    let buttons = button
        .padded_by(hspace)
        .repeated()
        .collect::<Vec<_>>();

    // {3,5,4}
    let counters = value
        .padded_by(hspace)
        .separated_by(just(','))
        .collect::<Vec<u32>>()
        .delimited_by(just('{'), just('}'));

    diagram
        .or_not()
        .then_ignore(hspace)
        .then(buttons)
        .then(counters.or_not())
        .then_ignore(hspace)
        .then_ignore(end())
        .map(|((pattern, buttons), counters)| {
            Machine::new(
                pattern.unwrap_or_default(),
                counters.unwrap_or_default(),
                buttons,
            )
        })
}

/// Parses a single machine description such as `[.##.] (3) (1,3) {3,5,4,7}`.
pub fn parse_machine(line: &str) -> Result<Machine> {
    parse_line(&machine(), 1, line)
}

/// Parses one machine per non-blank line.
pub fn parse_machines(input: &str) -> Result<Vec<Machine>> {
    let parser = machine();
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| parse_line(&parser, i + 1, line))
        .collect()
}

fn parse_line<'a>(
    parser: &impl Parser<'a, &'a str, Machine, extra::Err<Rich<'a, char>>>,
    line_number: usize,
    line: &'a str,
) -> Result<Machine> {
    parser.parse(line.trim()).into_result().map_err(|errors| {
        miette!(
            "Parse failed on line {}: {}",
            line_number,
            errors.iter().map(|e| format!("{e:?}")).join("; ")
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use bitvec::prelude::*;
    use rstest::rstest;

    #[test]
    fn parses_full_line() -> Result<()> {
        let machine = parse_machine("[.##.] (3) (1,3) (2) (2,3) (0,2) (0,1) {3,5,4,7}")?;
        assert_eq!(bits![usize, Lsb0; 0, 1, 1, 0], machine.light_target());
        assert_eq!(&[3, 5, 4, 7], machine.counter_target());
        assert_eq!(6, machine.num_buttons());
        assert_eq!(&[1, 3], machine.buttons()[1].light_indices());
        assert_eq!(&[0, 1], machine.buttons()[5].counter_indices());
        Ok(())
    }

    #[rstest]
    #[case("[.#] (1)", 2, 0, 1)]
    #[case("(0,1) {2,2}", 0, 2, 1)]
    #[case("[##]", 2, 0, 0)]
    #[case("  [#.]   ( 0 , 1 )  { 4 } ", 2, 1, 1)]
    #[case("[] () {}", 0, 0, 1)]
    fn optional_parts(
        #[case] line: &str,
        #[case] lights: usize,
        #[case] counters: usize,
        #[case] buttons: usize,
    ) -> Result<()> {
        let machine = parse_machine(line)?;
        assert_eq!(lights, machine.num_lights());
        assert_eq!(counters, machine.num_counters());
        assert_eq!(buttons, machine.num_buttons());
        Ok(())
    }

    #[rstest]
    #[case("[.x] (0)")]
    #[case("[.#] (0")]
    #[case("[.#] (a)")]
    #[case("[.#] (0) {-1}")]
    #[case("[.#] (0) {99999999999}")]
    #[case("[.#] (0) {1} (1)")]
    fn rejects_malformed(#[case] line: &str) {
        assert!(parse_machine(line).is_err());
    }

    #[test]
    fn parses_many_and_skips_blank_lines() -> Result<()> {
        let input = "[.##.] (3) (1,3) (2) (2,3) (0,2) (0,1) {3,5,4,7}

[...#.] (0,2,3,4) (2,3) (0,4) (0,1,2) (1,2,3,4) {7,5,12,7,2}
";
        let machines = parse_machines(input)?;
        assert_eq!(2, machines.len());
        assert_eq!(5, machines[1].num_lights());
        Ok(())
    }

    #[test]
    fn reports_line_number() {
        let err = parse_machines("[.#] (1)\n\n[#] (0) {x}").unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }
}
