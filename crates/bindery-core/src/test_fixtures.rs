//! Shared bindable fixtures for in-crate tests.

use crate::{
    bind::{Bindable, FieldAccessor},
    introspect::field,
    meta::InstanceMetadata,
    source::RawSource,
    value::Value,
};
use bindery_schema::{
    decl::{ClassDecl, FieldDecl},
    types::{ScalarType, TypeTag},
};
use time::PrimitiveDateTime;

///
/// Address
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Address {
    pub street: String,
    pub city: Option<String>,
    pub meta: InstanceMetadata,
}

impl Bindable for Address {
    const CLASS_NAME: &'static str = "Address";

    fn decl() -> ClassDecl {
        ClassDecl::new(Self::CLASS_NAME)
            .field(field::<String>("street").required(true))
            .field(field::<Option<String>>("city"))
    }

    fn accessors() -> &'static [FieldAccessor<Self>] {
        const ACCESSORS: &[FieldAccessor<Address>] = &[
            FieldAccessor::new(
                "street",
                |o, _| Ok(Value::from(o.street.clone())),
                |o, v, _| {
                    o.street = v.try_text()?;
                    Ok(())
                },
            ),
            FieldAccessor::new(
                "city",
                |o, _| Ok(Value::from(o.city.clone())),
                |o, v, _| {
                    o.city = v.try_opt(Value::try_text)?;
                    Ok(())
                },
            ),
        ];

        ACCESSORS
    }

    fn metadata(&self) -> &InstanceMetadata {
        &self.meta
    }

    fn metadata_mut(&mut self) -> &mut InstanceMetadata {
        &mut self.meta
    }
}

///
/// User
///
/// Exercises aliasing, defaults, enums, arrays, dates, nesting, and the
/// admin-only profile field.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct User {
    pub first_name: String,
    pub age: Option<i64>,
    pub score: f64,
    pub status: Option<String>,
    pub tags: Vec<String>,
    pub attributes: Value,
    pub created: Option<PrimitiveDateTime>,
    pub address: Option<Address>,
    pub secret: Option<String>,
    pub meta: InstanceMetadata,
}

impl Bindable for User {
    const CLASS_NAME: &'static str = "User";

    fn decl() -> ClassDecl {
        ClassDecl::new(Self::CLASS_NAME)
            .field(field::<String>("firstName").required(true))
            .field(field::<Option<i64>>("age").source_name("years"))
            .field(field::<f64>("score").default_value(1.5))
            .field(
                field::<Option<String>>("status").enum_values(["A", "B"]),
            )
            .field(field::<Vec<String>>("tags"))
            .field(
                FieldDecl::new("attributes")
                    .ty(ScalarType::String)
                    .array(true),
            )
            .field(field::<Option<PrimitiveDateTime>>("created"))
            .field(
                FieldDecl::new("address")
                    .ty(TypeTag::class(Address::CLASS_NAME))
                    .nullable(true),
            )
            .field(field::<Option<String>>("secret").profile("admin"))
    }

    fn accessors() -> &'static [FieldAccessor<Self>] {
        const ACCESSORS: &[FieldAccessor<User>] = &[
            FieldAccessor::new(
                "firstName",
                |o, _| Ok(Value::from(o.first_name.clone())),
                |o, v, _| {
                    o.first_name = v.try_text()?;
                    Ok(())
                },
            ),
            FieldAccessor::new(
                "age",
                |o, _| Ok(Value::from(o.age)),
                |o, v, _| {
                    o.age = v.try_opt(Value::try_int)?;
                    Ok(())
                },
            ),
            FieldAccessor::new(
                "score",
                |o, _| Ok(Value::from(o.score)),
                |o, v, _| {
                    o.score = v.try_float()?;
                    Ok(())
                },
            ),
            FieldAccessor::new(
                "status",
                |o, _| Ok(Value::from(o.status.clone())),
                |o, v, _| {
                    o.status = v.try_opt(Value::try_text)?;
                    Ok(())
                },
            ),
            FieldAccessor::new(
                "tags",
                |o, _| Ok(Value::from(o.tags.clone())),
                |o, v, _| {
                    o.tags = v
                        .try_list()?
                        .into_iter()
                        .map(Value::try_text)
                        .collect::<Result<_, _>>()?;
                    Ok(())
                },
            ),
            FieldAccessor::new(
                "attributes",
                |o, _| Ok(o.attributes.clone()),
                |o, v, _| {
                    o.attributes = v;
                    Ok(())
                },
            ),
            FieldAccessor::new(
                "created",
                |o, _| Ok(Value::from(o.created)),
                |o, v, _| {
                    o.created = v.try_opt(Value::try_date)?;
                    Ok(())
                },
            ),
            FieldAccessor::new(
                "address",
                |o, ctx| ctx.to_plain_opt(o.address.as_ref()),
                |o, v, ctx| {
                    o.address = ctx.hydrate_opt(v)?;
                    Ok(())
                },
            ),
            FieldAccessor::new(
                "secret",
                |o, _| Ok(Value::from(o.secret.clone())),
                |o, v, _| {
                    o.secret = v.try_opt(Value::try_text)?;
                    Ok(())
                },
            ),
        ];

        ACCESSORS
    }

    fn metadata(&self) -> &InstanceMetadata {
        &self.meta
    }

    fn metadata_mut(&mut self) -> &mut InstanceMetadata {
        &mut self.meta
    }
}

///
/// Guarded
///
/// Validation hooks: per-field rejects limits above 100, whole-object
/// rejects negative limits.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Guarded {
    pub limit: i64,
    pub meta: InstanceMetadata,
}

impl Bindable for Guarded {
    const CLASS_NAME: &'static str = "Guarded";

    fn decl() -> ClassDecl {
        ClassDecl::new(Self::CLASS_NAME).field(field::<i64>("limit").required(true))
    }

    fn accessors() -> &'static [FieldAccessor<Self>] {
        const ACCESSORS: &[FieldAccessor<Guarded>] = &[FieldAccessor::new(
            "limit",
            |o, _| Ok(Value::from(o.limit)),
            |o, v, _| {
                o.limit = v.try_int()?;
                Ok(())
            },
        )];

        ACCESSORS
    }

    fn metadata(&self) -> &InstanceMetadata {
        &self.meta
    }

    fn metadata_mut(&mut self) -> &mut InstanceMetadata {
        &mut self.meta
    }

    fn validate_field(&self, field: &str, value: &Value) -> bool {
        field != "limit" || !matches!(value, Value::Int(i) if *i > 100)
    }

    fn validate(&self) -> bool {
        self.limit >= 0
    }
}

///
/// Shape / Circle
///
/// Discriminator: raw input with kind == "circle" selects Circle.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shape {
    pub kind: String,
    pub meta: InstanceMetadata,
}

impl Bindable for Shape {
    const CLASS_NAME: &'static str = "Shape";

    fn decl() -> ClassDecl {
        ClassDecl::new(Self::CLASS_NAME).field(field::<String>("kind").required(true))
    }

    fn accessors() -> &'static [FieldAccessor<Self>] {
        const ACCESSORS: &[FieldAccessor<Shape>] = &[FieldAccessor::new(
            "kind",
            |o, _| Ok(Value::from(o.kind.clone())),
            |o, v, _| {
                o.kind = v.try_text()?;
                Ok(())
            },
        )];

        ACCESSORS
    }

    fn metadata(&self) -> &InstanceMetadata {
        &self.meta
    }

    fn metadata_mut(&mut self) -> &mut InstanceMetadata {
        &mut self.meta
    }

    fn discriminate(raw: &dyn RawSource) -> Option<&'static str> {
        match raw.get_value("kind") {
            Some(Value::Text(kind)) if kind == "circle" => Some(Circle::CLASS_NAME),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Circle {
    pub kind: String,
    pub radius: f64,
    pub meta: InstanceMetadata,
}

impl Bindable for Circle {
    const CLASS_NAME: &'static str = "Circle";

    fn decl() -> ClassDecl {
        ClassDecl::new(Self::CLASS_NAME)
            .field(field::<String>("kind").required(true))
            .field(field::<f64>("radius").required(true))
    }

    fn accessors() -> &'static [FieldAccessor<Self>] {
        const ACCESSORS: &[FieldAccessor<Circle>] = &[
            FieldAccessor::new(
                "kind",
                |o, _| Ok(Value::from(o.kind.clone())),
                |o, v, _| {
                    o.kind = v.try_text()?;
                    Ok(())
                },
            ),
            FieldAccessor::new(
                "radius",
                |o, _| Ok(Value::from(o.radius)),
                |o, v, _| {
                    o.radius = v.try_float()?;
                    Ok(())
                },
            ),
        ];

        ACCESSORS
    }

    fn metadata(&self) -> &InstanceMetadata {
        &self.meta
    }

    fn metadata_mut(&mut self) -> &mut InstanceMetadata {
        &mut self.meta
    }
}

///
/// Node
///
/// Self-referential schema for the depth-guard tests.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node {
    pub label: String,
    pub next: Option<Box<Node>>,
    pub meta: InstanceMetadata,
}

impl Bindable for Node {
    const CLASS_NAME: &'static str = "Node";

    fn decl() -> ClassDecl {
        ClassDecl::new(Self::CLASS_NAME)
            .field(field::<String>("label").required(true))
            .field(
                FieldDecl::new("next")
                    .ty(TypeTag::class(Self::CLASS_NAME))
                    .nullable(true),
            )
    }

    fn accessors() -> &'static [FieldAccessor<Self>] {
        const ACCESSORS: &[FieldAccessor<Node>] = &[
            FieldAccessor::new(
                "label",
                |o, _| Ok(Value::from(o.label.clone())),
                |o, v, _| {
                    o.label = v.try_text()?;
                    Ok(())
                },
            ),
            FieldAccessor::new(
                "next",
                |o, ctx| ctx.to_plain_opt(o.next.as_deref()),
                |o, v, ctx| {
                    o.next = ctx.hydrate_opt(v)?.map(Box::new);
                    Ok(())
                },
            ),
        ];

        ACCESSORS
    }

    fn metadata(&self) -> &InstanceMetadata {
        &self.meta
    }

    fn metadata_mut(&mut self) -> &mut InstanceMetadata {
        &mut self.meta
    }
}
