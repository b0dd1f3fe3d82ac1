use crate::lang::parsing::{Quotation, Term};

/// An explicit cursor over the terms of a quotation.  One reader exists for every closure that is
/// currently executing.  The executor and any word that reads ahead of itself share the same
/// reader, so terms consumed by a word are never seen by the executor.
#[derive(Clone, Debug)]
pub struct TermReader {
    body: Quotation,
    position: usize,
}

impl TermReader {
    pub fn new(body: Quotation) -> TermReader {
        TermReader { body, position: 0 }
    }

    /// Hand out the next unconsumed term, if there is one.
    pub fn next_term(&mut self) -> Option<Term> {
        let term = self.body.get(self.position).cloned();

        if term.is_some() {
            self.position += 1;
        }

        term
    }

    /// How many terms have been consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_done(&self) -> bool {
        self.position >= self.body.len()
    }
}
