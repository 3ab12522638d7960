pub mod decompose;
pub mod effects;
pub mod exhaustive;
pub mod gf2;
pub mod machine;
pub mod parser;
pub mod part1;
pub mod part2;
pub mod report;
pub mod solver;
