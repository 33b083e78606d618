//! Rendering types for diagnostics

use super::{ProducedType, TypeModel, Variance};

impl TypeModel {
    /// Source-like rendering of a type: `String?`, `Integer[]`, `A|B`, `A&B`
    pub fn type_name(&self, ty: &ProducedType) -> String {
        match ty {
            ProducedType::Nothing => "Nothing".to_string(),
            ProducedType::Unknown => "unknown".to_string(),
            ProducedType::Parameter(p) => self.name(*p).to_string(),
            ProducedType::Union(cases) => {
                if let [a, b] = cases.as_slice() {
                    let null = self.null_type();
                    if *a == null {
                        return format!("{}?", self.nested_name(b));
                    }
                    if *b == null {
                        return format!("{}?", self.nested_name(a));
                    }
                }
                cases
                    .iter()
                    .map(|c| self.type_name(c))
                    .collect::<Vec<_>>()
                    .join("|")
            }
            ProducedType::Intersection(types) => types
                .iter()
                .map(|t| self.nested_name(t))
                .collect::<Vec<_>>()
                .join("&"),
            ProducedType::Declared(applied) => {
                if applied.decl == self.lang().sequential
                    && applied.args.len() == 1
                    && applied.use_site.is_empty()
                {
                    return format!("{}[]", self.nested_name(&applied.args[0]));
                }
                let mut name = String::new();
                if let Some(outer) = &applied.qualifying {
                    name.push_str(&self.type_name(outer));
                    name.push('.');
                }
                name.push_str(self.name(applied.decl));
                if !applied.args.is_empty() {
                    let args: Vec<String> = applied
                        .args
                        .iter()
                        .enumerate()
                        .map(|(i, arg)| match applied.use_site_variance(i) {
                            Some(Variance::Covariant) => format!("out {}", self.type_name(arg)),
                            Some(Variance::Contravariant) => format!("in {}", self.type_name(arg)),
                            _ => self.type_name(arg),
                        })
                        .collect();
                    name.push('<');
                    name.push_str(&args.join(", "));
                    name.push('>');
                }
                name
            }
        }
    }

    /// Name of a type appearing as an operand of a postfix or infix type
    /// operator
    fn nested_name(&self, ty: &ProducedType) -> String {
        match ty {
            ProducedType::Union(_) | ProducedType::Intersection(_) => {
                format!("<{}>", self.type_name(ty))
            }
            _ => self.type_name(ty),
        }
    }
}
