use easy_ext::ext;
use roxmltree::Node;

#[ext(NodeExt)]
impl<'a, 'input: 'a> Node<'a, 'input> {
    /// Element whose tag is `name`, ignoring ASCII case.
    pub fn is_named(&self, name: &str) -> bool {
        self.is_element() && self.tag_name().name().eq_ignore_ascii_case(name)
    }

    pub fn tag(&self) -> &'a str {
        self.tag_name().name()
    }
}

pub fn child_elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}
