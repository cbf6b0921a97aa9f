//! Lazy rose trees for shrinking test values.
//!
//! A tree pairs a generated value with its shrink possibilities:
//! children are strictly smaller variants by the generating
//! combinator's ordering, produced on demand and memoised. Forcing one
//! level never forces grandchildren, so a large generated value does
//! not materialise its whole shrink space up front.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub mod render;

enum Branches<T> {
    Pending(Rc<dyn Fn() -> Vec<Tree<T>>>),
    Forced(Rc<Vec<Tree<T>>>),
}

/// A rose tree containing a value and its shrink possibilities.
///
/// Cloning is cheap: clones share the (memoised) children, which is not
/// observable because trees are immutable once built.
pub struct Tree<T> {
    root: T,
    branches: Rc<RefCell<Branches<T>>>,
}

impl<T: Clone> Clone for Tree<T> {
    fn clone(&self) -> Self {
        Tree {
            root: self.root.clone(),
            branches: Rc::clone(&self.branches),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Children may be an unforced thunk; show the root only.
        f.debug_struct("Tree")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + 'static> Tree<T> {
    /// A leaf with no shrink possibilities.
    pub fn singleton(root: T) -> Self {
        Tree::with_children(root, Vec::new())
    }

    /// A tree with already-realised children.
    pub fn with_children(root: T, children: Vec<Tree<T>>) -> Self {
        Tree {
            root,
            branches: Rc::new(RefCell::new(Branches::Forced(Rc::new(children)))),
        }
    }

    /// A tree whose children are computed on first access.
    pub fn lazy<F>(root: T, children: F) -> Self
    where
        F: Fn() -> Vec<Tree<T>> + 'static,
    {
        Tree {
            root,
            branches: Rc::new(RefCell::new(Branches::Pending(Rc::new(children)))),
        }
    }

    /// The realised value at this node.
    pub fn root(&self) -> &T {
        &self.root
    }

    /// Force and return this node's children. Memoised: the thunk runs
    /// at most once, and re-iteration observes identical children.
    pub fn children(&self) -> Rc<Vec<Tree<T>>> {
        let thunk = match &*self.branches.borrow() {
            Branches::Forced(children) => return Rc::clone(children),
            Branches::Pending(thunk) => Rc::clone(thunk),
        };
        let forced = Rc::new(thunk());
        *self.branches.borrow_mut() = Branches::Forced(Rc::clone(&forced));
        forced
    }

    /// Whether this node has any shrink possibilities.
    pub fn has_shrinks(&self) -> bool {
        !self.children().is_empty()
    }

    /// Apply `f` to the root and, lazily, to every descendant.
    pub fn map<U, F>(&self, f: F) -> Tree<U>
    where
        U: Clone + 'static,
        F: Fn(&T) -> U + 'static,
    {
        self.map_rc(Rc::new(f))
    }

    fn map_rc<U: Clone + 'static>(&self, f: Rc<dyn Fn(&T) -> U>) -> Tree<U> {
        let root = f(&self.root);
        let source = self.clone();
        Tree::lazy(root, move || {
            source
                .children()
                .iter()
                .map(|child| child.map_rc(Rc::clone(&f)))
                .collect()
        })
    }

    /// Prune child branches whose root fails `pred`.
    ///
    /// The root itself is assumed to already satisfy `pred` and is kept
    /// unchecked; invoking `filter` on a tree whose root fails the
    /// predicate is a caller error.
    pub fn filter<F>(&self, pred: F) -> Tree<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        self.filter_rc(Rc::new(pred))
    }

    fn filter_rc(&self, pred: Rc<dyn Fn(&T) -> bool>) -> Tree<T> {
        let source = self.clone();
        Tree::lazy(self.root.clone(), move || {
            source
                .children()
                .iter()
                .filter(|child| pred(child.root()))
                .map(|child| child.filter_rc(Rc::clone(&pred)))
                .collect()
        })
    }

    /// Lift grandchildren one level: the new children are the original
    /// children followed by the (recursively collapsed) grandchildren.
    pub fn collapse(&self) -> Tree<T> {
        let source = self.clone();
        Tree::lazy(self.root.clone(), move || {
            let children = source.children();
            let mut out: Vec<Tree<T>> = children.iter().map(Tree::collapse).collect();
            for child in children.iter() {
                out.extend(child.children().iter().map(Tree::collapse));
            }
            out
        })
    }
}

impl<T: Clone + 'static> Tree<Tree<T>> {
    /// Flatten a tree of trees.
    ///
    /// The new root is the inner root; the new children are the joined
    /// outer children followed by the inner root's own children.
    pub fn join(&self) -> Tree<T> {
        let inner = self.root.clone();
        let outer = self.clone();
        Tree::lazy(inner.root().clone(), move || {
            let mut out: Vec<Tree<T>> = outer.children().iter().map(Tree::join).collect();
            out.extend(inner.children().iter().cloned());
            out
        })
    }
}

impl<T: Clone + 'static> From<T> for Tree<T> {
    fn from(value: T) -> Self {
        Tree::singleton(value)
    }
}

/// Combine two trees with `f` at every level.
///
/// Children substitute one axis at a time: left children first (each
/// paired with the unchanged right tree), then right children. No cross
/// product.
pub fn zip2<A, B, C, F>(f: F, left: Tree<A>, right: Tree<B>) -> Tree<C>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    F: Fn(&A, &B) -> C + 'static,
{
    zip2_rc(Rc::new(f), left, right)
}

fn zip2_rc<A, B, C>(f: Rc<dyn Fn(&A, &B) -> C>, left: Tree<A>, right: Tree<B>) -> Tree<C>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
{
    let root = f(left.root(), right.root());
    Tree::lazy(root, move || {
        let mut out = Vec::new();
        for child in left.children().iter() {
            out.push(zip2_rc(Rc::clone(&f), child.clone(), right.clone()));
        }
        for child in right.children().iter() {
            out.push(zip2_rc(Rc::clone(&f), left.clone(), child.clone()));
        }
        out
    })
}

/// Combine a fixed-length vector of trees with `f` at every level.
///
/// Axes are iterated in order and each axis's children in order; every
/// child substitutes exactly one axis. Length never changes.
pub fn zip_all<T, U, F>(f: F, trees: Vec<Tree<T>>) -> Tree<U>
where
    T: Clone + 'static,
    U: Clone + 'static,
    F: Fn(&[T]) -> U + 'static,
{
    zip_all_rc(Rc::new(f), Rc::new(trees))
}

fn zip_all_rc<T, U>(f: Rc<dyn Fn(&[T]) -> U>, trees: Rc<Vec<Tree<T>>>) -> Tree<U>
where
    T: Clone + 'static,
    U: Clone + 'static,
{
    let roots: Vec<T> = trees.iter().map(|t| t.root().clone()).collect();
    let root = f(&roots);
    Tree::lazy(root, move || {
        let mut out = Vec::new();
        for (axis, tree) in trees.iter().enumerate() {
            for child in tree.children().iter() {
                let mut next = (*trees).clone();
                next[axis] = child.clone();
                out.push(zip_all_rc(Rc::clone(&f), Rc::new(next)));
            }
        }
        out
    })
}

/// Like [`zip_all`], but additionally yields, before any substitution,
/// a variant with each position removed. Collection generators use this
/// so length shrinks compose with element shrinks.
pub fn shrink_all<T, U, F>(f: F, trees: Vec<Tree<T>>) -> Tree<U>
where
    T: Clone + 'static,
    U: Clone + 'static,
    F: Fn(&[T]) -> U + 'static,
{
    shrink_all_rc(Rc::new(f), Rc::new(trees))
}

fn shrink_all_rc<T, U>(f: Rc<dyn Fn(&[T]) -> U>, trees: Rc<Vec<Tree<T>>>) -> Tree<U>
where
    T: Clone + 'static,
    U: Clone + 'static,
{
    let roots: Vec<T> = trees.iter().map(|t| t.root().clone()).collect();
    let root = f(&roots);
    Tree::lazy(root, move || {
        let mut out = Vec::new();
        for removed in 0..trees.len() {
            let mut next = (*trees).clone();
            next.remove(removed);
            out.push(shrink_all_rc(Rc::clone(&f), Rc::new(next)));
        }
        for (axis, tree) in trees.iter().enumerate() {
            for child in tree.children().iter() {
                let mut next = (*trees).clone();
                next[axis] = child.clone();
                out.push(shrink_all_rc(Rc::clone(&f), Rc::new(next)));
            }
        }
        out
    })
}
