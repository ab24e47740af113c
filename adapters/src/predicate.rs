//! Query predicates over tagged columns.
//!
//! A [`TaggedField`] binds a column expression to the descriptor resolved for
//! it. Every value offered to a predicate builder must carry that same tag and
//! primitive kind; the predicate itself only ever holds bare primitives.
//!
//! NULL follows SQL three-valued logic: it never satisfies `eq`, `ne`,
//! `is_in` or `not_in`, only `is_null`.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

use rusqlite::types::Value;
use tagkit_resolver::{ResolveTag, Signature};
use tagkit_types::{EffectiveIdentity, PrimitiveKind, RawValue, TagDescriptor, TagError};

/// A raw comparable column expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    kind: PrimitiveKind,
}

impl Field {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: PrimitiveKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> PrimitiveKind {
        self.kind
    }
}

/// A field together with the marker its values must bear.
#[derive(Debug, Clone)]
pub struct TaggedField {
    field: Field,
    descriptor: TagDescriptor,
}

#[allow(clippy::should_implement_trait)]
impl TaggedField {
    /// Fails with `TypeMismatch` when the field's kind and the descriptor's
    /// kind disagree.
    pub fn new(field: Field, descriptor: TagDescriptor) -> Result<Self, TagError> {
        if field.kind != descriptor.kind() {
            return Err(TagError::mismatch(
                field.kind.type_name(),
                descriptor.kind().type_name(),
            ));
        }
        Ok(Self { field, descriptor })
    }

    /// Resolve the field's declared type, then bind it.
    pub fn resolve<R: ResolveTag>(
        field: Field,
        resolver: &R,
        signature: &Signature,
    ) -> Result<Self, TagError> {
        let descriptor = resolver.resolve(&format!("field:{}", field.name()), signature)?;
        Self::new(field, descriptor)
    }

    #[must_use]
    pub fn field(&self) -> &Field {
        &self.field
    }

    #[must_use]
    pub const fn descriptor(&self) -> TagDescriptor {
        self.descriptor
    }

    fn accept(&self, value: &(impl EffectiveIdentity + ?Sized)) -> Result<RawValue, TagError> {
        let tag = value.effective_tag();
        if tag != self.descriptor.tag() {
            return Err(TagError::mismatch(self.descriptor.tag().name(), tag.name()));
        }
        let raw = value.effective_value();
        if raw.kind() != self.field.kind {
            return Err(TagError::mismatch(
                self.field.kind.type_name(),
                raw.kind().type_name(),
            ));
        }
        Ok(raw)
    }

    fn accept_all<E, I>(&self, values: I) -> Result<Vec<RawValue>, TagError>
    where
        E: EffectiveIdentity,
        I: IntoIterator<Item = E>,
    {
        values.into_iter().map(|value| self.accept(&value)).collect()
    }

    pub fn eq(&self, value: &(impl EffectiveIdentity + ?Sized)) -> Result<Predicate, TagError> {
        Ok(Predicate::Eq(self.field.name.clone(), self.accept(value)?))
    }

    pub fn ne(&self, value: &(impl EffectiveIdentity + ?Sized)) -> Result<Predicate, TagError> {
        Ok(Predicate::Ne(self.field.name.clone(), self.accept(value)?))
    }

    pub fn is_in<E, I>(&self, values: I) -> Result<Predicate, TagError>
    where
        E: EffectiveIdentity,
        I: IntoIterator<Item = E>,
    {
        Ok(Predicate::In(self.field.name.clone(), self.accept_all(values)?))
    }

    pub fn not_in<E, I>(&self, values: I) -> Result<Predicate, TagError>
    where
        E: EffectiveIdentity,
        I: IntoIterator<Item = E>,
    {
        Ok(Predicate::NotIn(self.field.name.clone(), self.accept_all(values)?))
    }

    #[must_use]
    pub fn is_null(&self) -> Predicate {
        Predicate::IsNull(self.field.name.clone())
    }

    #[must_use]
    pub fn is_not_null(&self) -> Predicate {
        Predicate::IsNotNull(self.field.name.clone())
    }
}

/// A row of named, possibly-null primitives.
pub trait Record {
    /// `None` means NULL (or absent).
    fn field(&self, name: &str) -> Option<&RawValue>;
}

impl Record for HashMap<String, RawValue> {
    fn field(&self, name: &str) -> Option<&RawValue> {
        self.get(name)
    }
}

impl Record for BTreeMap<String, RawValue> {
    fn field(&self, name: &str) -> Option<&RawValue> {
        self.get(name)
    }
}

impl Record for HashMap<String, Option<RawValue>> {
    fn field(&self, name: &str) -> Option<&RawValue> {
        self.get(name).and_then(Option::as_ref)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(String, RawValue),
    Ne(String, RawValue),
    In(String, Vec<RawValue>),
    NotIn(String, Vec<RawValue>),
    IsNull(String),
    IsNotNull(String),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

/// SQL text with positional parameters (`?1`, `?2`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Predicate {
    #[must_use]
    pub fn and(self, other: Predicate) -> Predicate {
        match self {
            Predicate::And(mut all) => {
                all.push(other);
                Predicate::And(all)
            }
            first => Predicate::And(vec![first, other]),
        }
    }

    #[must_use]
    pub fn or(self, other: Predicate) -> Predicate {
        match self {
            Predicate::Or(mut any) => {
                any.push(other);
                Predicate::Or(any)
            }
            first => Predicate::Or(vec![first, other]),
        }
    }

    #[must_use]
    pub fn matches(&self, record: &impl Record) -> bool {
        match self {
            Predicate::Eq(name, value) => record.field(name) == Some(value),
            Predicate::Ne(name, value) => record.field(name).is_some_and(|found| found != value),
            Predicate::In(name, values) => record
                .field(name)
                .is_some_and(|found| values.contains(found)),
            Predicate::NotIn(name, values) => record
                .field(name)
                .is_some_and(|found| !values.contains(found)),
            Predicate::IsNull(name) => record.field(name).is_none(),
            Predicate::IsNotNull(name) => record.field(name).is_some(),
            Predicate::And(all) => all.iter().all(|p| p.matches(record)),
            Predicate::Or(any) => any.iter().any(|p| p.matches(record)),
        }
    }

    #[must_use]
    pub fn to_sql(&self) -> SqlFragment {
        let mut fragment = SqlFragment {
            sql: String::new(),
            params: Vec::new(),
        };
        self.render(&mut fragment);
        fragment
    }

    fn render(&self, out: &mut SqlFragment) {
        match self {
            Predicate::Eq(name, value) => {
                push_ident(&mut out.sql, name);
                out.sql.push_str(" = ");
                push_param(out, value);
            }
            Predicate::Ne(name, value) => {
                push_ident(&mut out.sql, name);
                out.sql.push_str(" <> ");
                push_param(out, value);
            }
            Predicate::In(_, values) if values.is_empty() => out.sql.push_str("1 = 0"),
            Predicate::NotIn(name, values) if values.is_empty() => {
                push_ident(&mut out.sql, name);
                out.sql.push_str(" IS NOT NULL");
            }
            Predicate::In(name, values) | Predicate::NotIn(name, values) => {
                push_ident(&mut out.sql, name);
                let negated = matches!(self, Predicate::NotIn(..));
                out.sql.push_str(if negated { " NOT IN (" } else { " IN (" });
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        out.sql.push_str(", ");
                    }
                    push_param(out, value);
                }
                out.sql.push(')');
            }
            Predicate::IsNull(name) => {
                push_ident(&mut out.sql, name);
                out.sql.push_str(" IS NULL");
            }
            Predicate::IsNotNull(name) => {
                push_ident(&mut out.sql, name);
                out.sql.push_str(" IS NOT NULL");
            }
            Predicate::And(parts) => render_group(out, parts, " AND ", "1 = 1"),
            Predicate::Or(parts) => render_group(out, parts, " OR ", "1 = 0"),
        }
    }
}

fn render_group(out: &mut SqlFragment, parts: &[Predicate], joiner: &str, empty: &str) {
    if parts.is_empty() {
        out.sql.push_str(empty);
        return;
    }
    out.sql.push('(');
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.sql.push_str(joiner);
        }
        part.render(out);
    }
    out.sql.push(')');
}

fn push_ident(sql: &mut String, name: &str) {
    sql.push('"');
    sql.push_str(&name.replace('"', "\"\""));
    sql.push('"');
}

fn push_param(out: &mut SqlFragment, value: &RawValue) {
    out.params.push(value.clone().into_sql_value());
    let _ = write!(out.sql, "?{}", out.params.len());
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tagkit_resolver::{ExplicitOnly, MarkerRegistry, Signature, TagResolver};
    use tagkit_types::{
        DynTagged, LongTagged, PrimitiveKind, RawValue, TagDescriptor, TextTagged, TypeTag,
        define_markers,
    };

    use super::{Field, Predicate, TaggedField};

    define_markers! {
        User;
        Product;
        Order;
        Invoice;
    }

    fn user_field() -> TaggedField {
        TaggedField::new(
            Field::new("user_id", PrimitiveKind::Text),
            TagDescriptor::of::<String, User>(),
        )
        .unwrap()
    }

    fn users(ids: &[&str]) -> Vec<TextTagged<User>> {
        ids.iter().map(|id| TextTagged::from(*id)).collect()
    }

    fn row(id: Option<&str>) -> HashMap<String, RawValue> {
        id.map(|id| ("user_id".to_owned(), RawValue::Text(id.to_owned())))
            .into_iter()
            .collect()
    }

    #[test]
    fn field_and_descriptor_kinds_must_agree() {
        let err = TaggedField::new(
            Field::new("user_id", PrimitiveKind::Int64),
            TagDescriptor::of::<String, User>(),
        )
        .unwrap_err();
        assert!(err.is_mismatch());
    }

    #[test]
    fn values_with_other_tags_are_rejected() {
        let field = user_field();
        let product = TextTagged::<Product>::from("user-1");
        assert!(field.eq(&product).unwrap_err().is_mismatch());
        assert!(field.is_in([product]).unwrap_err().is_mismatch());
    }

    #[test]
    fn values_with_other_kinds_are_rejected() {
        let field = user_field();
        let wrong = DynTagged::new(RawValue::Int64(1), TypeTag::of::<User>());
        assert!(field.ne(&wrong).unwrap_err().is_mismatch());
    }

    #[test]
    fn in_matches_exactly_the_set_and_not_in_its_complement() {
        let field = user_field();
        let chosen = users(&["user-1", "user-2", "user-3"]);
        let is_in = field.is_in(&chosen).unwrap();
        let not_in = field.not_in(&chosen).unwrap();

        for id in ["user-1", "user-2", "user-3", "user-4", "user-5"] {
            let record = row(Some(id));
            let member = chosen.iter().any(|u| u.as_str() == id);
            assert_eq!(is_in.matches(&record), member, "{id}");
            assert_eq!(not_in.matches(&record), !member, "{id}");
        }
    }

    #[test]
    fn null_checks_are_exclusive_and_exhaustive() {
        let field = user_field();
        for record in [row(None), row(Some("user-1"))] {
            let null = field.is_null().matches(&record);
            let not_null = field.is_not_null().matches(&record);
            assert_ne!(null, not_null);
        }
    }

    #[test]
    fn null_never_matches_comparisons() {
        let field = user_field();
        let one = TextTagged::<User>::from("user-1");
        let record = row(None);
        assert!(!field.eq(&one).unwrap().matches(&record));
        assert!(!field.ne(&one).unwrap().matches(&record));
        assert!(!field.is_in([&one]).unwrap().matches(&record));
        assert!(!field.not_in([&one]).unwrap().matches(&record));
    }

    #[test]
    fn renders_positional_sql() {
        let field = user_field();
        let predicate = field
            .is_in(&users(&["user-1", "user-2", "user-3"]))
            .unwrap()
            .or(field.is_null());
        let fragment = predicate.to_sql();
        insta::assert_snapshot!(fragment.sql, @r#"("user_id" IN (?1, ?2, ?3) OR "user_id" IS NULL)"#);
        assert_eq!(fragment.params.len(), 3);
    }

    #[test]
    fn renders_empty_lists_consistently() {
        let field = user_field();
        let none: Vec<TextTagged<User>> = Vec::new();
        insta::assert_snapshot!(field.is_in(&none).unwrap().to_sql().sql, @"1 = 0");
        insta::assert_snapshot!(field.not_in(&none).unwrap().to_sql().sql, @r#""user_id" IS NOT NULL"#);
        assert!(!field.is_in(&none).unwrap().matches(&row(Some("user-1"))));
        assert!(field.not_in(&none).unwrap().matches(&row(Some("user-1"))));
    }

    #[test]
    fn quotes_identifiers() {
        let field = TaggedField::new(
            Field::new("odd\"name", PrimitiveKind::Int64),
            TagDescriptor::of::<i64, User>(),
        )
        .unwrap();
        let sql = field.eq(&LongTagged::<User>::new(1)).unwrap().to_sql().sql;
        assert_eq!(sql, "\"odd\"\"name\" = ?1");
    }

    #[test]
    fn and_flattens() {
        let field = user_field();
        let predicate = field
            .is_not_null()
            .and(field.ne(&TextTagged::<User>::from("a")).unwrap())
            .and(field.ne(&TextTagged::<User>::from("b")).unwrap());
        assert!(matches!(&predicate, Predicate::And(parts) if parts.len() == 3));
        assert!(predicate.matches(&row(Some("c"))));
        assert!(!predicate.matches(&row(Some("a"))));
    }

    #[test]
    fn resolves_field_from_declared_signature() {
        let registry = MarkerRegistry::new().with::<User>().unwrap();
        let resolver = TagResolver::new(registry);
        let field = TaggedField::resolve(
            Field::new("user_id", PrimitiveKind::Text),
            &resolver,
            &Signature::parse("TextTagged<User>").unwrap(),
        )
        .unwrap();
        assert_eq!(field.descriptor(), TagDescriptor::of::<String, User>());

        let err = TaggedField::resolve(
            Field::new("user_id", PrimitiveKind::Text),
            &ExplicitOnly,
            &Signature::parse("TextTagged<User>").unwrap(),
        )
        .unwrap_err();
        assert!(err.is_missing_tag());
    }

    #[test]
    fn same_column_name_in_two_tables_keeps_its_own_marker() {
        let registry = MarkerRegistry::new()
            .with::<Order>()
            .and_then(MarkerRegistry::with::<Invoice>)
            .unwrap();
        let resolver = TagResolver::new(registry);
        let orders = TaggedField::resolve(
            Field::new("id", PrimitiveKind::Int64),
            &resolver,
            &Signature::parse("LongTagged<Order>").unwrap(),
        )
        .unwrap();
        let invoices = TaggedField::resolve(
            Field::new("id", PrimitiveKind::Int64),
            &resolver,
            &Signature::parse("LongTagged<Invoice>").unwrap(),
        )
        .unwrap();

        assert_eq!(invoices.descriptor(), TagDescriptor::of::<i64, Invoice>());
        assert!(invoices.eq(&LongTagged::<Order>::new(1)).unwrap_err().is_mismatch());
        assert!(invoices.eq(&LongTagged::<Invoice>::new(1)).is_ok());
        assert!(orders.eq(&LongTagged::<Order>::new(1)).is_ok());
    }
}
