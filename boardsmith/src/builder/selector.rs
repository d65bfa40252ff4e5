//! Trace endpoint selectors
//!
//! Accepted forms:
//! - `.R1 > .positive` — component `R1`, port named `positive`
//! - `.R1 > .2` — component `R1`, pin number 2
//! - `R1.positive` — shorthand for the above
//! - `net.GND` — the net named `GND`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::BuildError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortSelector {
    Name(String),
    /// 1-based pin number
    Index(u32),
}

impl PortSelector {
    fn parse(token: &str) -> Self {
        match token.parse::<u32>() {
            Ok(pin) => PortSelector::Index(pin),
            Err(_) => PortSelector::Name(token.to_string()),
        }
    }
}

impl fmt::Display for PortSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortSelector::Name(name) => write!(f, "{}", name),
            PortSelector::Index(pin) => write!(f, "{}", pin),
        }
    }
}

/// Explicit `{component, port}` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRef {
    pub component: String,
    pub port: String,
}

impl PortRef {
    pub fn new(component: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            port: port.into(),
        }
    }
}

/// What a trace endpoint was declared as. Selector strings are parsed at
/// build time so chained configuration never has to handle errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Endpoint {
    Selector(String),
    Port(PortRef),
}

impl Endpoint {
    pub fn net(name: &str) -> Self {
        Endpoint::Selector(format!("net.{}", name))
    }

    pub fn parse(&self) -> Result<Target, BuildError> {
        match self {
            Endpoint::Selector(s) => s.parse(),
            Endpoint::Port(r) => {
                if r.component.is_empty() || r.port.is_empty() {
                    return Err(BuildError::InvalidSelector(format!(
                        "{}.{}",
                        r.component, r.port
                    )));
                }
                Ok(Target::Port {
                    component: r.component.clone(),
                    port: PortSelector::parse(&r.port),
                })
            }
        }
    }
}

impl From<&str> for Endpoint {
    fn from(s: &str) -> Self {
        Endpoint::Selector(s.to_string())
    }
}

impl From<String> for Endpoint {
    fn from(s: String) -> Self {
        Endpoint::Selector(s)
    }
}

impl From<PortRef> for Endpoint {
    fn from(r: PortRef) -> Self {
        Endpoint::Port(r)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Selector(s) => write!(f, "{}", s),
            Endpoint::Port(r) => write!(f, ".{} > .{}", r.component, r.port),
        }
    }
}

/// A parsed endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Port {
        component: String,
        port: PortSelector,
    },
    Net {
        name: String,
    },
}

impl FromStr for Target {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BuildError::InvalidSelector(s.to_string());
        let trimmed = s.trim();

        if let Some(name) = trimmed.strip_prefix("net.") {
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(invalid());
            }
            return Ok(Target::Net {
                name: name.to_string(),
            });
        }

        let (component, port) = if trimmed.contains('>') {
            let parts: Vec<&str> = trimmed.split('>').map(str::trim).collect();
            if parts.len() != 2 {
                return Err(invalid());
            }
            let component = parts[0].strip_prefix('.').ok_or_else(invalid)?;
            let port = parts[1].strip_prefix('.').ok_or_else(invalid)?;
            (component, port)
        } else {
            trimmed.split_once('.').ok_or_else(invalid)?
        };

        let valid = |t: &str| !t.is_empty() && !t.contains(char::is_whitespace) && !t.contains('.');
        if !valid(component) || !valid(port) {
            return Err(invalid());
        }
        Ok(Target::Port {
            component: component.to_string(),
            port: PortSelector::parse(port),
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Port { component, port } => write!(f, ".{} > .{}", component, port),
            Target::Net { name } => write!(f, "net.{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(component: &str, port: PortSelector) -> Target {
        Target::Port {
            component: component.to_string(),
            port,
        }
    }

    #[test]
    fn test_css_style_selector() {
        let target: Target = ".R1 > .positive".parse().unwrap();
        assert_eq!(target, port("R1", PortSelector::Name("positive".into())));
        assert_eq!(target.to_string(), ".R1 > .positive");
    }

    #[test]
    fn test_pin_number_selector() {
        let target: Target = ".U1 > .7".parse().unwrap();
        assert_eq!(target, port("U1", PortSelector::Index(7)));
    }

    #[test]
    fn test_dotted_shorthand() {
        let target: Target = "C2.negative".parse().unwrap();
        assert_eq!(target, port("C2", PortSelector::Name("negative".into())));
    }

    #[test]
    fn test_net_selector() {
        let target: Target = "net.GND".parse().unwrap();
        assert_eq!(
            target,
            Target::Net {
                name: "GND".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_selectors() {
        for bad in ["R1", ".R1 > positive", ".R1 > .a > .b", "net.", "", ". > .x", "a.b.c"] {
            assert!(
                matches!(bad.parse::<Target>(), Err(BuildError::InvalidSelector(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_explicit_port_ref() {
        let endpoint = Endpoint::from(PortRef::new("R2", "1"));
        assert_eq!(endpoint.parse().unwrap(), port("R2", PortSelector::Index(1)));
        assert_eq!(endpoint.to_string(), ".R2 > .1");
    }
}
