//! Typed expressions of the 3D Tiles styling language.
//!
//! An [`Expr`] renders to the exact string a `Cesium3DTileStyle` expects and
//! can also be evaluated locally against a feature's tags, which is how the
//! catalog is tested without a renderer.

use std::fmt;

use foundation::math::{LatLon, degree_distance};

use crate::value::{FeatureTags, Value};

/// Limit for nested define lookups; deeper chains evaluate to `undefined`.
const MAX_DEFINE_DEPTH: usize = 16;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOp {
    StrictEq,
    Gt,
    Ge,
    Lt,
    And,
    Or,
}

impl BinaryOp {
    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::StrictEq => "===",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::StrictEq => 3,
            BinaryOp::Gt | BinaryOp::Ge | BinaryOp::Lt => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    /// `${feature['name']}`
    Feature(String),
    /// `${name}`, resolved through the descriptor's defines.
    Var(String),
    /// `Number(x)`
    ToNumber(Box<Expr>),
    /// `vec2(x, y)`
    Vec2(Box<Expr>, Box<Expr>),
    /// `distance(a, b)`
    Distance(Box<Expr>, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn feature(name: impl Into<String>) -> Self {
        Expr::Feature(name.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    pub fn number(n: f64) -> Self {
        Expr::Literal(Value::Number(n))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Expr::Literal(Value::String(s.into()))
    }

    pub fn null() -> Self {
        Expr::Literal(Value::Null)
    }

    pub fn to_number(inner: Expr) -> Self {
        Expr::ToNumber(Box::new(inner))
    }

    pub fn vec2(x: Expr, y: Expr) -> Self {
        Expr::Vec2(Box::new(x), Box::new(y))
    }

    pub fn distance(a: Expr, b: Expr) -> Self {
        Expr::Distance(Box::new(a), Box::new(b))
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn strict_eq(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::StrictEq, self, rhs)
    }

    pub fn gt(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Gt, self, rhs)
    }

    pub fn ge(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Ge, self, rhs)
    }

    pub fn lt(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Lt, self, rhs)
    }

    pub fn or(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::Or, self, rhs)
    }

    pub fn and(self, rhs: Expr) -> Self {
        Self::binary(BinaryOp::And, self, rhs)
    }

    /// Left-folded `a || b || c`. Returns `None` for an empty iterator.
    pub fn any(terms: impl IntoIterator<Item = Expr>) -> Option<Self> {
        terms.into_iter().reduce(Expr::or)
    }

    /// `subject === 'a' || subject === 'b' || ...`
    pub fn one_of<'a>(subject: &Expr, values: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        Self::any(values.into_iter().map(|v| subject.clone().strict_eq(Expr::string(v))))
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Binary(op, _, _) => op.precedence(),
            _ => u8::MAX,
        }
    }

    pub fn eval(&self, scope: &Scope<'_>) -> Value {
        match self.eval_term(scope, 0) {
            Term::Scalar(v) => v,
            Term::Vec2(_) => Value::Undefined,
        }
    }

    fn eval_term(&self, scope: &Scope<'_>, depth: usize) -> Term {
        match self {
            Expr::Literal(v) => Term::Scalar(v.clone()),
            Expr::Feature(name) => Term::Scalar(scope.feature.tag(name)),
            Expr::Var(name) => scope.resolve(name, depth),
            Expr::ToNumber(inner) => {
                Term::Scalar(Value::Number(inner.eval_term(scope, depth).number()))
            }
            Expr::Vec2(x, y) => Term::Vec2([
                x.eval_term(scope, depth).number(),
                y.eval_term(scope, depth).number(),
            ]),
            Expr::Distance(a, b) => {
                let d = match (a.eval_term(scope, depth), b.eval_term(scope, depth)) {
                    // vec2 operands are (longitude, latitude)
                    (Term::Vec2([p_lon, p_lat]), Term::Vec2([q_lon, q_lat])) => {
                        degree_distance(LatLon::new(p_lat, p_lon), LatLon::new(q_lat, q_lon))
                    }
                    _ => f64::NAN,
                };
                Term::Scalar(Value::Number(d))
            }
            Expr::Binary(op, lhs, rhs) => {
                let l = lhs.eval_term(scope, depth);
                let out = match op {
                    BinaryOp::And => l.truthy() && rhs.eval_term(scope, depth).truthy(),
                    BinaryOp::Or => l.truthy() || rhs.eval_term(scope, depth).truthy(),
                    BinaryOp::StrictEq => l.strict_eq(&rhs.eval_term(scope, depth)),
                    BinaryOp::Gt => l.number() > rhs.eval_term(scope, depth).number(),
                    BinaryOp::Ge => l.number() >= rhs.eval_term(scope, depth).number(),
                    BinaryOp::Lt => l.number() < rhs.eval_term(scope, depth).number(),
                };
                Term::Scalar(Value::Bool(out))
            }
        }
    }

    fn fmt_child(&self, f: &mut fmt::Formatter<'_>, parent: u8, right: bool) -> fmt::Result {
        let prec = self.precedence();
        // All operators are left-associative; a right operand of equal
        // precedence keeps its grouping with parentheses.
        if prec < parent || (right && prec == parent) {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(v) => fmt_literal(v, f),
            Expr::Feature(name) => write!(f, "${{feature['{}']}}", escape(name)),
            Expr::Var(name) => write!(f, "${{{name}}}"),
            Expr::ToNumber(inner) => write!(f, "Number({inner})"),
            Expr::Vec2(x, y) => write!(f, "vec2({x}, {y})"),
            Expr::Distance(a, b) => write!(f, "distance({a}, {b})"),
            Expr::Binary(op, lhs, rhs) => {
                let prec = op.precedence();
                lhs.fmt_child(f, prec, false)?;
                write!(f, " {} ", op.symbol())?;
                rhs.fmt_child(f, prec, true)
            }
        }
    }
}

fn fmt_literal(v: &Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match v {
        Value::Undefined => f.write_str("undefined"),
        Value::Null => f.write_str("null"),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Number(n) => write!(f, "{n}"),
        Value::String(s) => write!(f, "'{}'", escape(s)),
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Evaluation environment: the feature being styled plus the named defines.
pub struct Scope<'a> {
    feature: &'a dyn FeatureTags,
    defines: &'a [(String, Expr)],
}

impl<'a> Scope<'a> {
    pub fn new(feature: &'a dyn FeatureTags, defines: &'a [(String, Expr)]) -> Self {
        Self { feature, defines }
    }

    fn resolve(&self, name: &str, depth: usize) -> Term {
        if depth >= MAX_DEFINE_DEPTH {
            return Term::Scalar(Value::Undefined);
        }
        match self.defines.iter().find(|(n, _)| n == name) {
            Some((_, expr)) => expr.eval_term(self, depth + 1),
            None => Term::Scalar(Value::Undefined),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Term {
    Scalar(Value),
    Vec2([f64; 2]),
}

impl Term {
    fn number(&self) -> f64 {
        match self {
            Term::Scalar(v) => v.to_number(),
            Term::Vec2(_) => f64::NAN,
        }
    }

    fn truthy(&self) -> bool {
        match self {
            Term::Scalar(v) => v.is_truthy(),
            Term::Vec2(_) => true,
        }
    }

    fn strict_eq(&self, other: &Term) -> bool {
        match (self, other) {
            (Term::Scalar(a), Term::Scalar(b)) => a.strict_eq(b),
            (Term::Vec2(a), Term::Vec2(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Expr, Scope};
    use crate::value::{FeatureProperties, Value};
    use foundation::math::{LatLon, degree_distance};

    #[test]
    fn renders_feature_tags_and_vars() {
        assert_eq!(
            Expr::to_number(Expr::feature("building:levels")).to_string(),
            "Number(${feature['building:levels']})"
        );
        assert_eq!(Expr::var("height").ge(Expr::number(30.0)).to_string(), "${height} >= 30");
    }

    #[test]
    fn renders_or_chains_without_redundant_parens() {
        let t = Expr::var("building_type");
        let e = Expr::one_of(&t, ["retail", "industrial"]).unwrap();
        assert_eq!(
            e.to_string(),
            "${building_type} === 'retail' || ${building_type} === 'industrial'"
        );
    }

    #[test]
    fn parenthesizes_lower_precedence_children() {
        let a = Expr::var("a").gt(Expr::number(1.0));
        let b = Expr::var("b").gt(Expr::number(2.0));
        let c = Expr::var("c").gt(Expr::number(3.0));
        assert_eq!(
            a.clone().or(b.clone()).and(c.clone()).to_string(),
            "(${a} > 1 || ${b} > 2) && ${c} > 3"
        );
        assert_eq!(a.or(b.and(c)).to_string(), "${a} > 1 || ${b} > 2 && ${c} > 3");
    }

    #[test]
    fn escapes_quotes_in_strings() {
        assert_eq!(Expr::string("o'neil").to_string(), r"'o\'neil'");
    }

    #[test]
    fn evaluates_defines_and_distance() {
        let defines = vec![(
            "d".to_string(),
            Expr::distance(
                Expr::vec2(Expr::feature("x"), Expr::feature("y")),
                Expr::vec2(Expr::number(0.0), Expr::number(0.0)),
            ),
        )];
        let f = FeatureProperties::new().with("x", 3.0).with("y", "4");
        let scope = Scope::new(&f, &defines);
        assert_eq!(Expr::var("d").eval(&scope), Value::Number(5.0));

        let missing = FeatureProperties::new();
        let scope = Scope::new(&missing, &defines);
        assert_eq!(Expr::var("d").gt(Expr::number(0.0)).eval(&scope), Value::Bool(false));
    }

    #[test]
    fn distance_matches_degree_distance_between_lon_lat_pairs() {
        let landmark = LatLon::new(25.03396, 121.5645);
        let building = LatLon::new(25.0412, 121.5501);
        let defines = vec![(
            "d".to_string(),
            Expr::distance(
                Expr::vec2(Expr::feature("lon"), Expr::feature("lat")),
                Expr::vec2(
                    Expr::number(landmark.lon_deg),
                    Expr::number(landmark.lat_deg),
                ),
            ),
        )];
        let f = FeatureProperties::new()
            .with("lon", building.lon_deg)
            .with("lat", building.lat_deg);
        assert_eq!(
            Expr::var("d").eval(&Scope::new(&f, &defines)),
            Value::Number(degree_distance(building, landmark))
        );
    }

    #[test]
    fn self_referencing_define_terminates() {
        let defines = vec![("loop".to_string(), Expr::var("loop"))];
        let f = FeatureProperties::new();
        assert_eq!(Expr::var("loop").eval(&Scope::new(&f, &defines)), Value::Undefined);
    }
}
