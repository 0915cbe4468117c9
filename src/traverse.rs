//! Lazy depth-first walks over an implicit graph.
//!
//! A walk is driven by an [`Adjacency`], which maps the path walked so far to
//! the steps that may follow it. Both cursors keep an explicit stack of
//! pending step iterators, one per path element, so a walk can be paused
//! between calls to `advance` and dropped at any point. No adjacency is
//! evaluated for a path until the consumer asks for the next path after it.
//!
//! Two consecutive paths, whether returned by `advance` or passed to
//! `next_steps`, agree on every element except possibly the last one of the
//! shorter path. State derived from a path can therefore be kept in step by
//! rewriting only that tail.

/// Source of the next steps from a path.
///
/// The order of the returned steps is the order they are walked in.
pub trait Adjacency {
    type Step;
    type Steps: Iterator<Item = Self::Step>;

    /// `path` is never empty; its first element is the root.
    fn next_steps(&mut self, path: &[Self::Step]) -> Self::Steps;
}

/// Visits each path before any path extending it.
pub struct PreOrder<A: Adjacency> {
    adjacency: A,
    path: Vec<A::Step>,
    /// `pending[i]` holds the unwalked steps after `path[..=i]`.
    pending: Vec<A::Steps>,
    state: PreState,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum PreState {
    /// The root is on `path` and has not been yielded.
    Start,
    /// The tail of `path` was yielded; its steps are not yet evaluated.
    Yielded,
    Walking,
}

impl<A: Adjacency> PreOrder<A> {
    pub fn new(root: A::Step, adjacency: A) -> Self {
        Self {
            adjacency,
            path: vec![root],
            pending: Vec::new(),
            state: PreState::Start,
        }
    }

    pub fn adjacency(&self) -> &A {
        &self.adjacency
    }

    /// Moves to the next path and returns it.
    ///
    /// The returned slice is reused by the walk; copy out whatever must
    /// outlive the next call.
    pub fn advance(&mut self) -> Option<&[A::Step]> {
        match self.state {
            PreState::Start => {
                self.state = PreState::Yielded;
                return Some(self.path.as_slice());
            }
            PreState::Yielded => {
                let steps = self.adjacency.next_steps(&self.path);
                self.pending.push(steps);
                self.state = PreState::Walking;
            }
            PreState::Walking => {}
        }
        // `pending` and `path` have equal length here.
        loop {
            let next = self.pending.last_mut()?.next();
            match next {
                Some(step) => {
                    self.path.push(step);
                    self.state = PreState::Yielded;
                    return Some(self.path.as_slice());
                }
                None => {
                    self.pending.pop();
                    self.path.pop();
                }
            }
        }
    }
}

impl<A: Adjacency> Iterator for PreOrder<A>
where
    A::Step: Clone,
{
    type Item = A::Step;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().and_then(|path| path.last().cloned())
    }
}

/// Visits each path after every path extending it.
pub struct PostOrder<A: Adjacency> {
    adjacency: A,
    path: Vec<A::Step>,
    /// `pending[i]` holds the unwalked steps after `path[..=i]`.
    pending: Vec<A::Steps>,
    root: Option<A::Step>,
    /// The tail of `path` has been yielded and must be popped.
    yielded: bool,
}

impl<A: Adjacency> PostOrder<A> {
    pub fn new(root: A::Step, adjacency: A) -> Self {
        Self {
            adjacency,
            path: Vec::new(),
            pending: Vec::new(),
            root: Some(root),
            yielded: false,
        }
    }

    pub fn adjacency(&self) -> &A {
        &self.adjacency
    }

    /// Moves to the next path and returns it.
    ///
    /// The returned slice is reused by the walk; copy out whatever must
    /// outlive the next call.
    pub fn advance(&mut self) -> Option<&[A::Step]> {
        if let Some(root) = self.root.take() {
            self.descend(root);
        } else if self.yielded {
            self.path.pop();
            self.yielded = false;
        }
        loop {
            let next = self.pending.last_mut()?.next();
            match next {
                Some(step) => self.descend(step),
                None => {
                    self.pending.pop();
                    self.yielded = true;
                    return Some(self.path.as_slice());
                }
            }
        }
    }

    fn descend(&mut self, step: A::Step) {
        self.path.push(step);
        let steps = self.adjacency.next_steps(&self.path);
        self.pending.push(steps);
    }
}

impl<A: Adjacency> Iterator for PostOrder<A>
where
    A::Step: Clone,
{
    type Item = A::Step;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().and_then(|path| path.last().cloned())
    }
}
