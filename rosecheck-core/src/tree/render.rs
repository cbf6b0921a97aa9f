//! Tree rendering for debugging and visualization.

use super::Tree;

impl<T> Tree<T>
where
    T: Clone + std::fmt::Display + 'static,
{
    /// Render the tree structure as a string for debugging.
    ///
    /// Forces children down to `max_depth` levels; deeper shrinks are
    /// elided with an ellipsis marker.
    pub fn render(&self, max_depth: usize) -> String {
        let mut result = String::new();
        self.render_recursive(&mut result, "", true, max_depth);
        result
    }

    fn render_recursive(&self, result: &mut String, prefix: &str, is_last: bool, depth: usize) {
        result.push_str(prefix);
        if is_last {
            result.push_str("└── ");
        } else {
            result.push_str("├── ");
        }
        result.push_str(&format!("{}\n", self.root()));

        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };

        if depth == 0 {
            if self.has_shrinks() {
                result.push_str(&format!("{child_prefix}└── …\n"));
            }
            return;
        }

        let children = self.children();
        for (i, child) in children.iter().enumerate() {
            let child_is_last = i == children.len() - 1;
            child.render_recursive(result, &child_prefix, child_is_last, depth - 1);
        }
    }

    /// Render the immediate shrink possibilities on one line.
    pub fn render_shrinks(&self) -> String {
        let children = self.children();
        if children.is_empty() {
            format!("{} (no shrinks)", self.root())
        } else {
            let shrinks: Vec<String> = children.iter().map(|c| format!("{}", c.root())).collect();
            format!("{} → [{}]", self.root(), shrinks.join(", "))
        }
    }
}
