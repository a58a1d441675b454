use crate::engines::execution::Program;
use rand::Rng;

/// Insert `gene` at a uniformly random position in `[0, len]`.
pub fn insert_gene<R: Rng>(program: &Program, gene: char, rng: &mut R) -> Program {
    let index = rng.gen_range(0..=program.len());
    insert_at(program, index, gene)
}

/// Replace the symbol at a uniformly random position with `gene`.
/// Empty programs have nothing to replace.
pub fn update_gene<R: Rng>(program: &Program, gene: char, rng: &mut R) -> Option<Program> {
    if program.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..program.len());
    Some(update_at(program, index, gene))
}

/// Remove the symbol at a uniformly random position.
pub fn delete_gene<R: Rng>(program: &Program, rng: &mut R) -> Option<Program> {
    if program.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..program.len());
    Some(delete_at(program, index))
}

pub fn insert_at(program: &Program, index: usize, gene: char) -> Program {
    let symbols = program.symbols();
    let mut child = Vec::with_capacity(symbols.len() + 1);
    child.extend_from_slice(&symbols[..index]);
    child.push(gene);
    child.extend_from_slice(&symbols[index..]);
    Program::new(child)
}

pub fn update_at(program: &Program, index: usize, gene: char) -> Program {
    let mut child = program.symbols().to_vec();
    child[index] = gene;
    Program::new(child)
}

pub fn delete_at(program: &Program, index: usize) -> Program {
    let mut child = program.symbols().to_vec();
    child.remove(index);
    Program::new(child)
}

/// Cut points of a crossover, each pair sorted ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutPoints {
    pub a1: usize,
    pub a2: usize,
    pub b1: usize,
    pub b2: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crossover {
    pub x: Program,
    pub y: Program,
    pub cuts: CutPoints,
}

/// Two-segment crossover: each child keeps its own parent's ends and takes
/// the other parent's middle segment.
pub fn breed<R: Rng>(a: &Program, b: &Program, rng: &mut R) -> Crossover {
    let (a1, a2) = cut_pair(a.len(), rng);
    let (b1, b2) = cut_pair(b.len(), rng);
    let cuts = CutPoints { a1, a2, b1, b2 };
    let (x, y) = splice(a, b, cuts);
    Crossover { x, y, cuts }
}

fn cut_pair<R: Rng>(len: usize, rng: &mut R) -> (usize, usize) {
    if len == 0 {
        return (0, 0);
    }
    let first = rng.gen_range(0..len);
    let second = rng.gen_range(0..len);
    (first.min(second), first.max(second))
}

/// `x = a[..a1] + b[b1..b2] + a[a2..]` and `y = b[..b1] + a[a1..a2] + b[b2..]`.
pub fn splice(a: &Program, b: &Program, cuts: CutPoints) -> (Program, Program) {
    let (a, b) = (a.symbols(), b.symbols());
    let CutPoints { a1, a2, b1, b2 } = cuts;

    let x = [&a[..a1], &b[b1..b2], &a[a2..]].concat();
    let y = [&b[..b1], &a[a1..a2], &b[b2..]].concat();
    (Program::new(x), Program::new(y))
}

/// Generate a random program of runs, moves, outputs and nested blocks.
/// Blocks stop nesting at `max_depth`.
pub fn random_program<R: Rng>(rng: &mut R, max_depth: usize) -> Program {
    let mut symbols = Vec::new();
    generate_block(rng, &mut symbols, 0, max_depth);
    Program::new(symbols)
}

fn generate_block<R: Rng>(rng: &mut R, symbols: &mut Vec<char>, depth: usize, max_depth: usize) {
    let count = rng.gen_range(1..=16);
    for _ in 0..count {
        match rng.gen_range(0..16) {
            0..=3 => {
                let run = rng.gen_range(1..=255);
                symbols.extend(std::iter::repeat('+').take(run));
            }
            4..=7 => {
                let run = rng.gen_range(1..=255);
                symbols.extend(std::iter::repeat('-').take(run));
            }
            8 => symbols.push('>'),
            9 => symbols.push('<'),
            10 => symbols.push('.'),
            11 if depth < max_depth => {
                symbols.push('[');
                generate_block(rng, symbols, depth + 1, max_depth);
                symbols.push(']');
            }
            _ => {}
        }
    }
}
