//! Formal words in the original generators.
//!
//! Every rewrite of the matrix tuple is mirrored on a tuple of `Word`s, so
//! each current generator stays expressible in the generators the caller
//! supplied. Words are persistent trees: `compose` and `inverse` allocate a
//! single node and share their operands, which keeps a long reduction cheap
//! even though the flattened words can grow quickly.

use crate::matrix::Sl2;
use crate::traits::GroupElement;
use serde::{Serialize, Serializer};
use std::fmt;
use std::rc::Rc;

/// One symbol `x_i` or `x_i⁻¹`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Letter {
    pub generator: usize,
    pub inverted: bool,
}

impl Letter {
    fn inverse(self) -> Self {
        Self {
            generator: self.generator,
            inverted: !self.inverted,
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverted {
            write!(f, "x{}^-1", self.generator)
        } else {
            write!(f, "x{}", self.generator)
        }
    }
}

enum Node {
    Letter(Letter),
    Product(Word, Word),
    Inverse(Word),
}

#[derive(Clone)]
pub struct Word(Rc<Node>);

impl Word {
    /// The word consisting of the single original generator `x_index`.
    pub fn generator(index: usize) -> Self {
        Self(Rc::new(Node::Letter(Letter {
            generator: index,
            inverted: false,
        })))
    }

    /// One word per original generator: `x0, x1, …, x{n-1}`.
    pub fn generators(count: usize) -> Vec<Self> {
        (0..count).map(Self::generator).collect()
    }

    /// The freely reduced spelling of this word.
    pub fn letters(&self) -> Vec<Letter> {
        let mut out: Vec<Letter> = Vec::new();
        let mut pending: Vec<(&Word, bool)> = vec![(self, false)];

        while let Some((word, inverted)) = pending.pop() {
            match &*word.0 {
                Node::Letter(letter) => {
                    let letter = if inverted { letter.inverse() } else { *letter };
                    if out.last() == Some(&letter.inverse()) {
                        out.pop();
                    } else {
                        out.push(letter);
                    }
                }
                // Stack order: the factor read first is pushed last.
                Node::Product(lhs, rhs) => {
                    if inverted {
                        pending.push((lhs, true));
                        pending.push((rhs, true));
                    } else {
                        pending.push((rhs, false));
                        pending.push((lhs, false));
                    }
                }
                Node::Inverse(inner) => pending.push((inner, !inverted)),
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.letters().len()
    }

    pub fn is_identity(&self) -> bool {
        self.letters().is_empty()
    }

    /// Substitutes the original generators. Returns `None` when the word
    /// mentions a generator index outside `generators`.
    pub fn evaluate(&self, generators: &[Sl2]) -> Option<Sl2> {
        let mut result = Sl2::identity();
        for letter in self.letters() {
            let g = generators.get(letter.generator)?;
            result = if letter.inverted {
                result.compose(&g.inverse())
            } else {
                result.compose(g)
            };
        }
        Some(result)
    }
}

impl GroupElement for Word {
    fn compose(&self, rhs: &Self) -> Self {
        Self(Rc::new(Node::Product(self.clone(), rhs.clone())))
    }

    fn inverse(&self) -> Self {
        if let Node::Inverse(inner) = &*self.0 {
            return inner.clone();
        }
        Self(Rc::new(Node::Inverse(self.clone())))
    }
}

impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        self.letters() == other.letters()
    }
}

impl Eq for Word {}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters = self.letters();
        if letters.is_empty() {
            return write!(f, "1");
        }
        let spelled: Vec<String> = letters.iter().map(Letter::to_string).collect();
        write!(f, "{}", spelled.join(" "))
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({})", self)
    }
}

impl Serialize for Word {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.letters().serialize(serializer)
    }
}
