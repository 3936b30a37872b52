//! `TreeNode`, the example schema type, plus helpers to encode and dump
//! trees of them.
//!
//! ```text
//! ┌────────┬──────────┬──────────────────┐
//! │ Offset │ Field    │ Kind             │
//! ├────────┼──────────┼──────────────────┤
//! │ 0      │ value    │ int              │
//! │ 4      │ is_leaf  │ boolean          │
//! │ 6      │ depth    │ short            │
//! │ 8      │ children │ List<TreeNode>   │
//! │ 16     │ label    │ text             │
//! └────────┴──────────┴──────────────────┘
//! ```

use segmsg_reader::{ReadError, reader_struct};

use crate::encoder::{MessageBuilder, WORD};

reader_struct! {
    /// One node of a tree; children are stored inline as a struct list.
    pub struct TreeNode {
        value @ 0: int,
        is_leaf @ 4: boolean,
        depth @ 6: short,
        children @ 8: (list TreeNode),
        label @ 16: text,
    }
}

/// Encoded size of a `TreeNode` body.
pub const TREE_NODE_SIZE: u32 = 24;

/// Where child lists are placed when a tree is encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// Everything in segment 0.
    Single,
    /// Each child list in a fresh segment, reached through a far pointer.
    FarChildren,
}

/// Plain description of a tree to encode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeSpec {
    pub value: i32,
    pub label: String,
    pub children: Vec<TreeSpec>,
}

impl TreeSpec {
    pub fn leaf(value: i32, label: &str) -> Self {
        Self {
            value,
            label: label.to_string(),
            children: Vec::new(),
        }
    }

    pub fn node(value: i32, label: &str, children: Vec<TreeSpec>) -> Self {
        Self {
            value,
            label: label.to_string(),
            children,
        }
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeSpec::size).sum::<usize>()
    }

    /// Encode with a root struct pointer at segment 0 offset 0.
    pub fn encode(&self, layout: Layout) -> MessageBuilder {
        let mut builder = MessageBuilder::new();
        let root = builder.alloc(0, WORD);
        let body = builder.alloc_struct(0, TREE_NODE_SIZE);
        builder.put_struct_pointer(0, root, body, TREE_NODE_SIZE);
        self.write(&mut builder, layout, 0, body, 0);
        builder
    }

    fn write(&self, b: &mut MessageBuilder, layout: Layout, segment: u32, at: usize, depth: i16) {
        b.put_int(segment, at, self.value);
        b.put_boolean(segment, at + 4, self.children.is_empty());
        b.put_short(segment, at + 6, depth);

        let label = b.alloc_data(segment, self.label.as_bytes());
        b.put_list_pointer(segment, at + 16, label);

        if self.children.is_empty() {
            return;
        }
        let count = u32::try_from(self.children.len()).unwrap();
        let target = match layout {
            Layout::Single => segment,
            Layout::FarChildren => b.add_segment(),
        };
        let (header, base) = b.alloc_list(target, count, TREE_NODE_SIZE);
        if target == segment {
            b.put_list_pointer(segment, at + 8, header);
        } else {
            b.put_far_list(segment, at + 8, target, header);
        }

        for (i, child) in self.children.iter().enumerate() {
            let child_at = base + i * TREE_NODE_SIZE as usize;
            child.write(b, layout, target, child_at, depth + 1);
        }
    }
}

/// Read a decoded node back into a [`TreeSpec`].
///
/// # Errors
///
/// Any [`ReadError`] raised while walking the tree.
pub fn collect(node: TreeNode<'_>) -> Result<TreeSpec, ReadError> {
    let children = node
        .children()?
        .iter()
        .map(collect)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TreeSpec {
        value: node.value()?,
        label: node.label()?.to_string(),
        children,
    })
}

/// Indented one-line-per-node rendering, used by snapshot tests.
///
/// # Errors
///
/// Any [`ReadError`] raised while walking the tree.
pub fn dump(node: TreeNode<'_>) -> Result<String, ReadError> {
    let mut out = String::new();
    dump_into(node, &mut out)?;
    Ok(out)
}

fn dump_into(node: TreeNode<'_>, out: &mut String) -> Result<(), ReadError> {
    let depth = usize::try_from(node.depth()?).unwrap_or(0);
    let reader = node.reader();
    out.push_str(&format!(
        "{:indent$}{} = {}{} [segment {} @ {:#06x}]\n",
        "",
        node.label()?,
        node.value()?,
        if node.is_leaf()? { " (leaf)" } else { "" },
        reader.segment_id(),
        reader.offset(),
        indent = depth * 2,
    ));
    for child in node.children()?.iter() {
        dump_into(child, out)?;
    }
    Ok(())
}
