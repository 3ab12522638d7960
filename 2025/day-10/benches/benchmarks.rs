use aoc2025_day_10::{part1, part2};

const INPUT: &str = "[.##.] (3) (1,3) (2) (2,3) (0,2) (0,1) {3,5,4,7}
[...#.] (0,2,3,4) (2,3) (0,4) (0,1,2) (1,2,3,4) {7,5,12,7,2}
[.###.#] (0,1,2,3,4) (0,3,4) (0,1,2,4,5) (1,2) {10,11,11,5,10,5}
[#..#.#..#.] (0,3,7) (1,2,9) (0,1,2,3) (5,8) (4,5) (0,5,6) (2,4) (1,3,5) (6,7,8,9) (0,9) (2,6) (3,8) (1,4,7) (5,9) {41,53,60,38,27,66,45,39,44,58}";

fn main() {
    divan::main();
}

#[divan::bench]
fn bench_part1() {
    part1::process(divan::black_box(INPUT)).unwrap();
}

#[divan::bench]
fn bench_part2() {
    part2::process(divan::black_box(INPUT)).unwrap();
}
