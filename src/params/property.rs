//! Named property values with synchronous change notification.
//!
//! A [`PropertySet`] owns both its values and its listeners. Subscribing
//! returns a [`ListenerToken`]; the token is the only way to unsubscribe, and
//! a listener stays registered until it is explicitly removed or the set is
//! dropped. Notifications run inline inside `set_property`, on whatever thread
//! owns the set (the control thread, never the audio thread).

use std::collections::BTreeMap;

/// A property value. Accessors return `None` on a type mismatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Float(f32),
    Text(String),
    Signal(Vec<f32>),
}

impl Property {
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Property::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Property::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_signal(&self) -> Option<&[f32]> {
        match self {
            Property::Signal(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f32> for Property {
    fn from(v: f32) -> Self {
        Property::Float(v)
    }
}

impl From<&str> for Property {
    fn from(s: &str) -> Self {
        Property::Text(s.to_owned())
    }
}

impl From<String> for Property {
    fn from(s: String) -> Self {
        Property::Text(s)
    }
}

impl From<Vec<f32>> for Property {
    fn from(s: Vec<f32>) -> Self {
        Property::Signal(s)
    }
}

/// Receives every property change made on the set it is subscribed to.
pub trait PropertyListener: Send {
    fn property_changed(&mut self, name: &str, value: &Property);
}

impl<F> PropertyListener for F
where
    F: FnMut(&str, &Property) + Send,
{
    fn property_changed(&mut self, name: &str, value: &Property) {
        self(name, value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerToken(u64);

#[derive(Default)]
pub struct PropertySet {
    properties: BTreeMap<String, Property>,
    listeners: Vec<(ListenerToken, Box<dyn PropertyListener>)>,
    next_token: u64,
}

impl std::fmt::Debug for PropertySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertySet")
            .field("properties", &self.properties)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn float_property(&self, name: &str) -> Option<f32> {
        self.property(name).and_then(Property::as_float)
    }

    pub fn text_property(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(Property::as_text)
    }

    pub fn signal_property(&self, name: &str) -> Option<&[f32]> {
        self.property(name).and_then(Property::as_signal)
    }

    /// Store a value and notify every listener before returning.
    pub fn set_property(&mut self, name: &str, value: impl Into<Property>) {
        let value = value.into();
        for (_, listener) in &mut self.listeners {
            listener.property_changed(name, &value);
        }
        self.properties.insert(name.to_owned(), value);
    }

    /// Replay every stored value to every listener, in name order.
    pub fn broadcast_all_properties(&mut self) {
        for (name, value) in &self.properties {
            for (_, listener) in &mut self.listeners {
                listener.property_changed(name, value);
            }
        }
    }

    pub fn subscribe(&mut self, listener: impl PropertyListener + 'static) -> ListenerToken {
        let token = ListenerToken(self.next_token);
        self.next_token += 1;
        self.listeners.push((token, Box::new(listener)));
        token
    }

    /// Returns false if the token was already removed.
    pub fn unsubscribe(&mut self, token: ListenerToken) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(t, _)| *t != token);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
