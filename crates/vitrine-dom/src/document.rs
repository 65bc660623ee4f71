//! Document - High-level document API
//!
//! Query and mutation helpers the site behaviors use: lookups by id,
//! class and attribute, class-list edits, inline styles, text content and
//! form-control values.

use crate::{DomError, DomTree, NodeId};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a document with an empty html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        let root = tree.root();
        tree.append_child(root, html).expect("fresh nodes");
        tree.append_child(html, head).expect("fresh nodes");
        tree.append_child(html, body).expect("fresh nodes");

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Locate <html>, <head> and <body> after the tree was built externally
    pub fn finalize(&mut self) {
        self.html_element = self.first_by_tag(self.tree.root(), "html");
        if self.html_element.is_valid() {
            self.head_element = self.first_by_tag(self.html_element, "head");
            self.body_element = self.first_by_tag(self.html_element, "body");
        }
    }

    fn first_by_tag(&self, start: NodeId, tag: &str) -> NodeId {
        self.tree
            .children(start)
            .find(|(_, n)| n.as_element().is_some_and(|e| e.is(tag)))
            .map_or(NodeId::NONE, |(id, _)| id)
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get document title
    pub fn title(&self) -> String {
        if !self.head_element.is_valid() {
            return String::new();
        }
        let title = self.first_by_tag(self.head_element, "title");
        if title.is_valid() {
            self.tree.text_content(title)
        } else {
            String::new()
        }
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    fn elements_matching<F>(&self, scope: NodeId, mut pred: F) -> impl Iterator<Item = NodeId> + '_
    where
        F: FnMut(&crate::ElementData) -> bool + 'static,
    {
        self.tree
            .descendants(scope)
            .into_iter()
            .filter(move |&id| self.tree.element(id).is_ok_and(&mut pred))
    }

    /// First element in tree order whose `id` matches
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let id = id.to_string();
        self.elements_matching(self.tree.root(), move |e| e.id() == Some(id.as_str()))
            .next()
    }

    /// All elements carrying `class`, in tree order
    pub fn get_elements_by_class_name(&self, class: &str) -> Vec<NodeId> {
        self.elements_by_class_within(self.tree.root(), class)
    }

    /// Elements carrying `class` under `scope`
    pub fn elements_by_class_within(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        let class = class.to_string();
        self.elements_matching(scope, move |e| e.classes.contains(&class))
            .collect()
    }

    /// First element carrying `class`
    pub fn first_by_class(&self, class: &str) -> Option<NodeId> {
        let class = class.to_string();
        self.elements_matching(self.tree.root(), move |e| e.classes.contains(&class))
            .next()
    }

    /// All elements with attribute `name` (`[name]`)
    pub fn elements_with_attribute(&self, name: &str) -> Vec<NodeId> {
        let name = name.to_string();
        self.elements_matching(self.tree.root(), move |e| e.has_attr(&name))
            .collect()
    }

    /// First element whose attribute equals `value` (`[name="value"]`)
    pub fn first_with_attribute_value(&self, name: &str, value: &str) -> Option<NodeId> {
        let (name, value) = (name.to_string(), value.to_string());
        self.elements_matching(self.tree.root(), move |e| {
            e.attr_owned(&name).as_deref() == Some(value.as_str())
        })
        .next()
    }

    /// Elements with tag name `tag` under `scope`
    pub fn elements_by_tag_within(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        let tag = tag.to_string();
        self.elements_matching(scope, move |e| e.is(&tag)).collect()
    }

    /// Nearest inclusive ancestor that is a `tag` element
    pub fn closest_tag(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.tree.ancestors(id))
            .find(|&a| self.tree.element(a).is_ok_and(|e| e.is(tag)))
    }

    // ------------------------------------------------------------------
    // Attributes, classes, style
    // ------------------------------------------------------------------

    /// Attribute value (`class` and `style` are serialized)
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<String> {
        self.tree.element(id).ok()?.attr_owned(name)
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.tree.element_mut(id)?.set_attr(name, value);
        Ok(())
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.tree
            .element(id)
            .is_ok_and(|e| e.classes.contains(class))
    }

    /// Add a class. Returns true if the class list changed.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<bool, DomError> {
        Ok(self.tree.element_mut(id)?.classes.add(class))
    }

    /// Remove a class. Returns true if the class list changed.
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> Result<bool, DomError> {
        Ok(self.tree.element_mut(id)?.classes.remove(class))
    }

    /// Toggle a class. Returns whether the class is now present.
    pub fn toggle_class(
        &mut self,
        id: NodeId,
        class: &str,
        force: Option<bool>,
    ) -> Result<bool, DomError> {
        Ok(self.tree.element_mut(id)?.classes.toggle(class, force))
    }

    pub fn style_property(&self, id: NodeId, property: &str) -> Option<String> {
        self.tree
            .element(id)
            .ok()?
            .style_property(property)
            .map(str::to_string)
    }

    pub fn set_style_property(
        &mut self,
        id: NodeId,
        property: &str,
        value: &str,
    ) -> Result<(), DomError> {
        self.tree.element_mut(id)?.set_style_property(property, value);
        Ok(())
    }

    pub fn text_content(&self, id: NodeId) -> String {
        self.tree.text_content(id)
    }

    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        self.tree.set_text_content(id, text)
    }

    /// Create an element and append it to `parent`
    pub fn append_new_element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId, DomError> {
        let id = self.tree.create_element(tag);
        self.tree.append_child(parent, id)?;
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Form controls
    // ------------------------------------------------------------------

    /// Current value of a form control.
    ///
    /// Falls back to the default value when the user never edited it: the
    /// text content for `<textarea>`, the `value` attribute otherwise.
    pub fn control_value(&self, id: NodeId) -> Option<String> {
        let elem = self.tree.element(id).ok()?;
        if !elem.is_form_control() {
            return None;
        }
        if let Some(value) = &elem.value {
            return Some(value.clone());
        }
        Some(if elem.is("textarea") {
            self.tree.text_content(id)
        } else {
            elem.attr("value").unwrap_or_default().to_string()
        })
    }

    /// Set the (dirty) value of a form control, as user input would
    pub fn set_control_value(&mut self, id: NodeId, value: &str) -> Result<(), DomError> {
        let elem = self.tree.element_mut(id)?;
        if !elem.is_form_control() {
            return Err(DomError::NotAnElement(id));
        }
        elem.value = Some(value.to_string());
        Ok(())
    }

    /// Named controls of a form, in tree order
    pub fn form_controls(&self, form: NodeId) -> Vec<NodeId> {
        self.elements_matching(form, |e| e.is_form_control() && e.has_attr("name"))
            .collect()
    }

    /// Value of the first control named `name` (`FormData.get`)
    pub fn form_value(&self, form: NodeId, name: &str) -> Option<String> {
        self.form_controls(form)
            .into_iter()
            .find(|&c| {
                self.tree
                    .element(c)
                    .is_ok_and(|e| e.attr("name") == Some(name))
            })
            .and_then(|c| self.control_value(c))
    }

    /// Restore every control of a form to its default value.
    /// Returns how many controls were reset.
    pub fn reset_form(&mut self, form: NodeId) -> Result<usize, DomError> {
        self.tree.element(form)?;
        let controls: Vec<NodeId> = self
            .elements_matching(form, |e| e.is_form_control())
            .collect();
        for &control in &controls {
            self.tree.element_mut(control)?.value = None;
        }
        tracing::trace!("Reset {} controls of form {}", controls.len(), form);
        Ok(controls.len())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(doc: &mut Document, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = doc.append_new_element(parent, tag).unwrap();
        for (k, v) in attrs {
            doc.set_attribute(id, k, v).unwrap();
        }
        id
    }

    #[test]
    fn test_skeleton() {
        let doc = Document::default();
        assert!(doc.document_element().is_valid());
        assert!(doc.body().is_valid());
        assert_eq!(doc.url(), "about:blank");
    }

    #[test]
    fn test_get_element_by_id() {
        let mut doc = Document::default();
        let body = doc.body();
        let header = add(&mut doc, body, "header", &[("id", "header")]);
        assert_eq!(doc.get_element_by_id("header"), Some(header));
        assert_eq!(doc.get_element_by_id("missing"), None);
    }

    #[test]
    fn test_class_queries_in_tree_order() {
        let mut doc = Document::default();
        let body = doc.body();
        let a = add(&mut doc, body, "section", &[("class", "page active")]);
        let b = add(&mut doc, body, "section", &[("class", "page")]);
        assert_eq!(doc.get_elements_by_class_name("page"), vec![a, b]);
        assert_eq!(doc.first_by_class("active"), Some(a));

        doc.remove_class(a, "active").unwrap();
        doc.add_class(b, "active").unwrap();
        assert!(!doc.has_class(a, "active"));
        assert!(doc.has_class(b, "active"));
    }

    #[test]
    fn test_attribute_value_query() {
        let mut doc = Document::default();
        let body = doc.body();
        add(&mut doc, body, "div", &[("class", "form-error"), ("data-field", "name")]);
        let email = add(&mut doc, body, "div", &[("class", "form-error"), ("data-field", "email")]);
        assert_eq!(doc.first_with_attribute_value("data-field", "email"), Some(email));
        assert_eq!(doc.elements_with_attribute("data-field").len(), 2);
    }

    #[test]
    fn test_control_values_and_reset() {
        let mut doc = Document::default();
        let body = doc.body();
        let form = add(&mut doc, body, "form", &[("id", "contactForm")]);
        let name = add(&mut doc, form, "input", &[("name", "name"), ("value", "")]);
        let msg = add(&mut doc, form, "textarea", &[("name", "message")]);

        assert_eq!(doc.form_value(form, "name").as_deref(), Some(""));
        doc.set_control_value(name, "Alice").unwrap();
        doc.set_control_value(msg, "hi").unwrap();
        assert_eq!(doc.form_value(form, "name").as_deref(), Some("Alice"));
        assert_eq!(doc.form_value(form, "message").as_deref(), Some("hi"));
        assert_eq!(doc.form_value(form, "phone"), None);

        assert_eq!(doc.reset_form(form).unwrap(), 2);
        assert_eq!(doc.control_value(name).as_deref(), Some(""));
        assert_eq!(doc.control_value(msg).as_deref(), Some(""));
    }

    #[test]
    fn test_set_control_value_rejects_non_controls() {
        let mut doc = Document::default();
        let body = doc.body();
        let div = add(&mut doc, body, "div", &[]);
        assert!(doc.set_control_value(div, "x").is_err());
    }
}
