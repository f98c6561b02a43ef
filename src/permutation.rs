//! Finite-support permutations of the integers.
//!
//! A [`Permutation`] is a bijection on `i64` that is the identity everywhere
//! except on a finite set of points, its support. Only the moved points are
//! stored, along with the reverse table, so evaluating the inverse is a
//! lookup and inverting is a table swap.
//!
//! Values are immutable: composition always builds a new permutation. The
//! inverse and the cycle decomposition are computed on first use and kept.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Mul;
use std::str::FromStr;
use std::sync::OnceLock;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermutationError {
    #[error("not one-to-one, as {first} and {second} both map to {image}")]
    NotInjective { first: i64, second: i64, image: i64 },
    #[error("{point} is mapped to both {first} and {second}")]
    ConflictingSource { point: i64, first: i64, second: i64 },
    #[error("{0:?} is not an integer")]
    NotAnInteger(String),
    #[error("malformed cycle notation: {0:?}")]
    MalformedCycles(String),
}

/// A bijection on the integers that fixes all but finitely many points.
#[derive(Clone, Default)]
pub struct Permutation {
    /// Moved points and their images. Never contains a fixed point.
    mapping: BTreeMap<i64, i64>,
    /// `mapping` read backwards.
    reverse: BTreeMap<i64, i64>,
    cycles: OnceLock<Vec<Vec<i64>>>,
    inverse: OnceLock<Box<Permutation>>,
}

impl Permutation {
    /// Builds a permutation from its tables, which must already describe a
    /// bijection without fixed points.
    fn from_tables(mapping: BTreeMap<i64, i64>, reverse: BTreeMap<i64, i64>) -> Self {
        Self {
            mapping,
            reverse,
            cycles: OnceLock::new(),
            inverse: OnceLock::new(),
        }
    }

    /// The permutation that fixes every integer.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Builds a permutation from `(point, image)` pairs.
    ///
    /// Pairs with `point == image` are dropped. Every image must itself be a
    /// moved point, otherwise the mapping is not a bijection.
    pub fn from_mapping<I>(pairs: I) -> Result<Self, PermutationError>
    where
        I: IntoIterator<Item = (i64, i64)>,
    {
        let mut sorted: BTreeMap<i64, i64> = BTreeMap::new();
        for (point, image) in pairs {
            if let Some(&first) = sorted.get(&point) {
                if first != image {
                    return Err(PermutationError::ConflictingSource {
                        point,
                        first,
                        second: image,
                    });
                }
            }
            sorted.insert(point, image);
        }

        let mut mapping = BTreeMap::new();
        let mut reverse = BTreeMap::new();
        for (point, image) in sorted {
            if point == image {
                continue;
            }
            if let Some(&second) = reverse.get(&image) {
                return Err(PermutationError::NotInjective {
                    first: point,
                    second,
                    image,
                });
            }
            mapping.insert(point, image);
            reverse.insert(image, point);
        }

        // an image that is not moved itself is implicitly fixed, so two
        // points would share it
        for (&image, &point) in &reverse {
            if !mapping.contains_key(&image) {
                return Err(PermutationError::NotInjective {
                    first: image,
                    second: point,
                    image,
                });
            }
        }

        Ok(Self::from_tables(mapping, reverse))
    }

    /// The 2-cycle exchanging `a` and `b`.
    pub fn transposition(a: i64, b: i64) -> Self {
        if a == b {
            return Self::identity();
        }
        let mapping = BTreeMap::from([(a, b), (b, a)]);
        Self::from_tables(mapping.clone(), mapping)
    }

    /// The single cycle sending each point to the next and the last back to
    /// the first.
    pub fn cycle(points: &[i64]) -> Result<Self, PermutationError> {
        let images = points.iter().skip(1).chain(points.first());
        Self::from_mapping(points.iter().copied().zip(images.copied()))
    }

    /// Composes several cycles left to right, so the last cycle acts first.
    pub fn cycle_sequence<C: AsRef<[i64]>>(cycles: &[C]) -> Result<Self, PermutationError> {
        cycles.iter().try_fold(Self::identity(), |acc, points| {
            Ok(acc.compose(&Self::cycle(points.as_ref())?))
        })
    }

    /// Image of `x`.
    #[inline]
    pub fn apply(&self, x: i64) -> i64 {
        self.mapping.get(&x).copied().unwrap_or(x)
    }

    /// Preimage of `x`, i.e. `self.inverse().apply(x)` without building the
    /// inverse.
    #[inline]
    pub fn apply_inverse(&self, x: i64) -> i64 {
        self.reverse.get(&x).copied().unwrap_or(x)
    }

    /// `self ∘ other`: apply `other` first, then `self`.
    pub fn compose(&self, other: &Permutation) -> Permutation {
        let mut mapping = self.mapping.clone();
        for (&point, &image) in &other.mapping {
            mapping.insert(point, self.apply(image));
        }
        mapping.retain(|point, image| point != image);
        let reverse = mapping.iter().map(|(&point, &image)| (image, point)).collect();
        Self::from_tables(mapping, reverse)
    }

    /// The inverse permutation, built once from the swapped tables.
    pub fn inverse(&self) -> &Permutation {
        self.inverse
            .get_or_init(|| Box::new(Self::from_tables(self.reverse.clone(), self.mapping.clone())))
    }

    /// Disjoint cycles of length at least two, each starting at its smallest
    /// point, ordered by that point.
    pub fn cycles(&self) -> &[Vec<i64>] {
        self.cycles.get_or_init(|| {
            let mut visited = BTreeSet::new();
            let mut cycles = Vec::new();
            for &start in self.mapping.keys() {
                if visited.contains(&start) {
                    continue;
                }
                let mut cycle = vec![start];
                let mut point = self.apply(start);
                while point != start {
                    cycle.push(point);
                    point = self.apply(point);
                }
                visited.extend(cycle.iter().copied());
                cycles.push(cycle);
            }
            cycles
        })
    }

    /// 0 for an even permutation, 1 for an odd one.
    ///
    /// A cycle of length `n` is a product of `n - 1` transpositions, so only
    /// even-length cycles change the parity.
    pub fn parity(&self) -> u8 {
        (self.cycles().iter().filter(|cycle| cycle.len() % 2 == 0).count() % 2) as u8
    }

    /// Moved points in ascending order.
    pub fn support(&self) -> impl Iterator<Item = i64> + '_ {
        self.mapping.keys().copied()
    }

    /// `(point, image)` pairs for the moved points, ascending by point.
    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.mapping.iter().map(|(&point, &image)| (point, image))
    }

    pub fn is_identity(&self) -> bool {
        self.mapping.is_empty()
    }
}

impl PartialEq for Permutation {
    fn eq(&self, other: &Self) -> bool {
        self.mapping == other.mapping
    }
}

impl Eq for Permutation {}

impl Hash for Permutation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.mapping.hash(state);
    }
}

impl Mul for &Permutation {
    type Output = Permutation;

    fn mul(self, rhs: Self) -> Permutation {
        self.compose(rhs)
    }
}

impl fmt::Debug for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Permutation({:?})", self.mapping)
    }
}

/// Cycle notation, e.g. `(1 5 7 3)(9 10)`. The identity is `()`.
impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_identity() {
            return f.write_str("()");
        }
        for cycle in self.cycles() {
            f.write_str("(")?;
            for (i, point) in cycle.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", point)?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// Parses cycle notation. Points may be separated by spaces or commas, and
/// cycles need not be disjoint: they compose left to right.
impl FromStr for Permutation {
    type Err = PermutationError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut cycles = Vec::new();
        let mut rest = text.trim();

        while !rest.is_empty() {
            let body = rest
                .strip_prefix('(')
                .ok_or_else(|| PermutationError::MalformedCycles(text.to_string()))?;
            let end = body
                .find(')')
                .ok_or_else(|| PermutationError::MalformedCycles(text.to_string()))?;

            let points = body[..end]
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|token| !token.is_empty())
                .map(|token| {
                    token
                        .parse::<i64>()
                        .map_err(|_| PermutationError::NotAnInteger(token.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;

            cycles.push(points);
            rest = body[end + 1..].trim_start();
        }

        Self::cycle_sequence(&cycles)
    }
}
