use std::collections::BTreeMap;

use serde::Serialize;

use crate::color::NamedColor;
use crate::expr::{Expr, Scope};
use crate::value::FeatureTags;

/// One `[predicate, color]` entry of a color rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorClause {
    pub when: Expr,
    pub color: NamedColor,
}

/// Predicate side of a condition, as seen when iterating a rule.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Condition<'a> {
    When(&'a Expr),
    /// The trailing catch-all.
    Always,
}

/// Ordered, first-match-wins color conditions.
///
/// The catch-all is not stored as a clause; it is always emitted last, so a
/// rule without one cannot be built.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorConditions {
    clauses: Vec<ColorClause>,
    fallback: NamedColor,
}

impl ColorConditions {
    pub fn new(fallback: NamedColor) -> Self {
        Self {
            clauses: Vec::new(),
            fallback,
        }
    }

    pub fn when(mut self, when: Expr, color: NamedColor) -> Self {
        self.clauses.push(ColorClause { when, color });
        self
    }

    pub fn clauses(&self) -> &[ColorClause] {
        &self.clauses
    }

    /// All conditions in evaluation order, ending with [`Condition::Always`].
    pub fn conditions(&self) -> impl Iterator<Item = (Condition<'_>, NamedColor)> + '_ {
        self.clauses
            .iter()
            .map(|c| (Condition::When(&c.when), c.color))
            .chain(std::iter::once((Condition::Always, self.fallback)))
    }

    fn resolve(&self, scope: &Scope<'_>) -> NamedColor {
        self.clauses
            .iter()
            .find(|c| c.when.eval(scope).is_truthy())
            .map_or(self.fallback, |c| c.color)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StyleRule {
    Color(ColorConditions),
    /// Features for which the expression is falsy are hidden.
    Show(Expr),
}

/// Declarative per-feature styling handed to the tileset.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDescriptor {
    defines: Vec<(String, Expr)>,
    rule: StyleRule,
}

/// Result of evaluating a descriptor against one feature.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Appearance {
    pub show: bool,
    /// `None` leaves the renderer's default color.
    pub color: Option<NamedColor>,
}

impl StyleDescriptor {
    pub fn color(conditions: ColorConditions) -> Self {
        Self {
            defines: Vec::new(),
            rule: StyleRule::Color(conditions),
        }
    }

    pub fn show(expr: Expr) -> Self {
        Self {
            defines: Vec::new(),
            rule: StyleRule::Show(expr),
        }
    }

    /// Adds a derived attribute, referenced in expressions as `${name}`.
    /// Redefining a name replaces the earlier expression.
    pub fn define(mut self, name: impl Into<String>, expr: Expr) -> Self {
        let name = name.into();
        match self.defines.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = expr,
            None => self.defines.push((name, expr)),
        }
        self
    }

    pub fn defines(&self) -> &[(String, Expr)] {
        &self.defines
    }

    pub fn defined(&self, name: &str) -> Option<&Expr> {
        self.defines.iter().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    pub fn color_conditions(&self) -> Option<&ColorConditions> {
        match &self.rule {
            StyleRule::Color(c) => Some(c),
            StyleRule::Show(_) => None,
        }
    }

    pub fn evaluate(&self, feature: &dyn FeatureTags) -> Appearance {
        let scope = Scope::new(feature, &self.defines);
        match &self.rule {
            StyleRule::Color(conditions) => Appearance {
                show: true,
                color: Some(conditions.resolve(&scope)),
            },
            StyleRule::Show(expr) => Appearance {
                show: expr.eval(&scope).is_truthy(),
                color: None,
            },
        }
    }

    /// The `Cesium3DTileStyle` JSON document for this descriptor.
    pub fn to_tile_style(&self) -> TileStyleDocument {
        let defines = self
            .defines
            .iter()
            .map(|(n, e)| (n.clone(), e.to_string()))
            .collect();
        let (color, show) = match &self.rule {
            StyleRule::Color(c) => {
                let conditions = c
                    .conditions()
                    .map(|(cond, color)| {
                        let pred = match cond {
                            Condition::When(e) => e.to_string(),
                            Condition::Always => "true".to_string(),
                        };
                        [pred, color.expression()]
                    })
                    .collect();
                (Some(ConditionsDocument { conditions }), None)
            }
            StyleRule::Show(e) => (None, Some(e.to_string())),
        };
        TileStyleDocument {
            defines,
            color,
            show,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        // Only strings and maps; serialization cannot fail.
        serde_json::to_value(self.to_tile_style()).unwrap_or(serde_json::Value::Null)
    }

    pub fn to_json_string(&self, pretty: bool) -> Result<String, serde_json::Error> {
        let doc = self.to_tile_style();
        if pretty {
            serde_json::to_string_pretty(&doc)
        } else {
            serde_json::to_string(&doc)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileStyleDocument {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub defines: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ConditionsDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionsDocument {
    pub conditions: Vec<[String; 2]>,
}
