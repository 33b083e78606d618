//! The type algebra: canonical unions and intersections, substitution,
//! subtyping, supertype search, disjointness and case coverage
//!
//! Every operation is total. Recursive operations carry a depth counter so
//! that pathological declaration graphs (cyclic inheritance left behind by
//! an earlier error) degrade to a conservative answer instead of
//! overflowing the stack.

use super::{AppliedType, DeclId, ProducedType, TypeArgMap, TypeModel, Variance};
use std::collections::HashSet;

const MAX_DEPTH: usize = 48;

/// Result of searching a type's supertypes for a declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupertypeSearch {
    Found(ProducedType),
    Missing,
    /// Two instantiations of the declaration that cannot be reconciled
    Ambiguous(ProducedType, ProducedType),
}

impl SupertypeSearch {
    pub fn found(self) -> Option<ProducedType> {
        match self {
            SupertypeSearch::Found(ty) => Some(ty),
            SupertypeSearch::Missing | SupertypeSearch::Ambiguous(..) => None,
        }
    }
}

impl TypeModel {
    // Construction

    /// Canonical union of `types`
    pub fn union(&self, types: impl IntoIterator<Item = ProducedType>) -> ProducedType {
        let mut cases = Vec::new();
        for ty in types {
            if !self.add_to_union(&mut cases, ty) {
                return ProducedType::Unknown;
            }
        }
        match cases.len() {
            0 => ProducedType::Nothing,
            1 => cases.swap_remove(0),
            _ => ProducedType::Union(cases),
        }
    }

    pub fn union2(&self, a: ProducedType, b: ProducedType) -> ProducedType {
        self.union([a, b])
    }

    /// Returns false when `ty` is `Unknown`, which absorbs the whole union
    fn add_to_union(&self, cases: &mut Vec<ProducedType>, ty: ProducedType) -> bool {
        match ty {
            ProducedType::Unknown => false,
            ProducedType::Nothing => true,
            ProducedType::Union(inner) => inner.into_iter().all(|c| self.add_to_union(cases, c)),
            ty => {
                if cases.iter().any(|c| self.is_subtype_of(&ty, c)) {
                    return true;
                }
                cases.retain(|c| !self.is_subtype_of(c, &ty));
                cases.push(ty);
                true
            }
        }
    }

    /// Canonical intersection of `types`
    pub fn intersection(&self, types: impl IntoIterator<Item = ProducedType>) -> ProducedType {
        let mut parts = Vec::new();
        for ty in types {
            match ty {
                ProducedType::Unknown => return ProducedType::Unknown,
                ProducedType::Nothing => return ProducedType::Nothing,
                ProducedType::Intersection(inner) => parts.extend(inner),
                ty => parts.push(ty),
            }
        }

        // distribute over the first union
        if let Some(index) = parts
            .iter()
            .position(|p| matches!(self.unalias(p).as_ref(), ProducedType::Union(_)))
        {
            let union = self.unalias(&parts.remove(index)).into_owned();
            let ProducedType::Union(cases) = union else {
                return ProducedType::Unknown;
            };
            return self.union(cases.into_iter().map(|case| {
                let mut distributed = parts.clone();
                distributed.push(case);
                self.intersection(distributed)
            }));
        }

        let mut satisfied: Vec<ProducedType> = Vec::new();
        for ty in parts {
            if self.is_anything(&ty) {
                continue;
            }
            if satisfied.iter().any(|s| self.is_subtype_of(s, &ty)) {
                continue;
            }
            satisfied.retain(|s| !self.is_subtype_of(&ty, s));
            satisfied.push(ty);
        }
        for (i, a) in satisfied.iter().enumerate() {
            for b in &satisfied[i + 1..] {
                if self.is_disjoint(a, b) {
                    return ProducedType::Nothing;
                }
            }
        }
        match satisfied.len() {
            0 => self.anything_type(),
            1 => satisfied.swap_remove(0),
            _ => ProducedType::Intersection(satisfied),
        }
    }

    pub fn intersection2(&self, a: ProducedType, b: ProducedType) -> ProducedType {
        self.intersection([a, b])
    }

    pub fn is_anything(&self, ty: &ProducedType) -> bool {
        matches!(self.unalias(ty).as_ref(),
            ProducedType::Declared(applied) if applied.decl == self.lang().anything)
    }

    pub fn is_object(&self, ty: &ProducedType) -> bool {
        matches!(self.unalias(ty).as_ref(),
            ProducedType::Declared(applied) if applied.decl == self.lang().object)
    }

    /// `decl` applied to `args`, with missing trailing arguments taken from
    /// the parameter defaults
    pub fn apply(&self, decl: DeclId, mut args: Vec<ProducedType>) -> ProducedType {
        let params = self.type_parameters(decl);
        if args.len() < params.len() {
            let mut map: TypeArgMap = params.iter().copied().zip(args.iter().cloned()).collect();
            for param in &params[args.len()..] {
                let default = self
                    .type_parameter(*param)
                    .and_then(|tp| tp.default.as_ref())
                    .map(|d| self.substitute(d, &map))
                    .unwrap_or(ProducedType::Unknown);
                map.insert(*param, default.clone());
                args.push(default);
            }
        }
        ProducedType::declared(decl, args)
    }

    // Substitution

    /// Map each type parameter of the applied declaration (and of its
    /// qualifying types) to its argument
    pub fn type_arg_map(&self, applied: &AppliedType) -> TypeArgMap {
        let mut map = match applied.qualifying.as_deref() {
            Some(ProducedType::Declared(outer)) => self.type_arg_map(outer),
            _ => TypeArgMap::new(),
        };
        for (i, param) in self.type_parameters(applied.decl).iter().enumerate() {
            let arg = match applied.args.get(i) {
                Some(arg) => arg.clone(),
                None => self
                    .type_parameter(*param)
                    .and_then(|tp| tp.default.as_ref())
                    .map(|d| self.substitute(d, &map))
                    .unwrap_or(ProducedType::Unknown),
            };
            map.insert(*param, arg);
        }
        map
    }

    /// Replace type parameters per `map`, recanonicalizing unions and
    /// intersections
    pub fn substitute(&self, ty: &ProducedType, map: &TypeArgMap) -> ProducedType {
        if map.is_empty() {
            return ty.clone();
        }
        match ty {
            ProducedType::Parameter(p) => map.get(p).cloned().unwrap_or_else(|| ty.clone()),
            ProducedType::Declared(applied) => ProducedType::Declared(AppliedType {
                decl: applied.decl,
                args: applied.args.iter().map(|a| self.substitute(a, map)).collect(),
                use_site: applied.use_site.clone(),
                qualifying: applied
                    .qualifying
                    .as_ref()
                    .map(|q| Box::new(self.substitute(q, map))),
            }),
            ProducedType::Union(cases) => {
                self.union(cases.iter().map(|c| self.substitute(c, map)))
            }
            ProducedType::Intersection(types) => {
                self.intersection(types.iter().map(|t| self.substitute(t, map)))
            }
            ProducedType::Nothing | ProducedType::Unknown => ty.clone(),
        }
    }

    // Subtyping

    pub fn is_subtype_of(&self, a: &ProducedType, b: &ProducedType) -> bool {
        self.subtype(a, b, 0)
    }

    /// Mutual subtypes
    pub fn is_exactly(&self, a: &ProducedType, b: &ProducedType) -> bool {
        a == b || (self.is_subtype_of(a, b) && self.is_subtype_of(b, a))
    }

    fn subtype(&self, a: &ProducedType, b: &ProducedType, depth: usize) -> bool {
        if depth > MAX_DEPTH {
            return false;
        }
        if a.is_unknown() || b.is_unknown() || a.is_nothing() {
            return true;
        }
        if a == b {
            return true;
        }
        let a = self.unalias(a);
        let b = self.unalias(b);
        let (a, b) = (a.as_ref(), b.as_ref());
        if a.is_unknown() || b.is_unknown() || a.is_nothing() || self.is_anything(b) {
            return true;
        }
        if b.is_nothing() {
            return false;
        }
        if let ProducedType::Union(cases) = a {
            return cases.iter().all(|c| self.subtype(c, b, depth + 1));
        }
        if let ProducedType::Intersection(types) = b {
            return types.iter().all(|t| self.subtype(a, t, depth + 1));
        }
        if let ProducedType::Union(cases) = b {
            if cases.iter().any(|c| self.subtype(a, c, depth + 1)) {
                return true;
            }
        }
        if let ProducedType::Intersection(types) = a {
            return types.iter().any(|t| self.subtype(t, b, depth + 1));
        }
        if let ProducedType::Parameter(p) = a {
            if b == a {
                return true;
            }
            return self
                .satisfied_types(*p)
                .iter()
                .any(|bound| self.subtype(bound, b, depth + 1));
        }
        let ProducedType::Declared(target) = b else {
            return false;
        };
        let Some(ProducedType::Declared(found)) =
            self.search(a, target.decl, depth + 1).found()
        else {
            return false;
        };
        self.arguments_conform(&found, target, depth)
    }

    /// Compare the arguments of two instantiations of the same declaration
    fn arguments_conform(&self, sub: &AppliedType, sup: &AppliedType, depth: usize) -> bool {
        let params = self.type_parameters(sup.decl);
        for (i, param) in params.iter().enumerate() {
            let (Some(sa), Some(ba)) = (sub.args.get(i), sup.args.get(i)) else {
                continue;
            };
            let variance = sup
                .use_site_variance(i)
                .unwrap_or_else(|| self.variance(*param));
            // a use-site annotated argument on the left only conforms to a
            // matching annotation on the right
            if let Some(sub_variance) = sub.use_site_variance(i) {
                if variance != sub_variance {
                    return false;
                }
            }
            let conforms = match variance {
                Variance::Covariant => self.subtype(sa, ba, depth + 1),
                Variance::Contravariant => self.subtype(ba, sa, depth + 1),
                Variance::Invariant => {
                    self.subtype(sa, ba, depth + 1) && self.subtype(ba, sa, depth + 1)
                }
            };
            if !conforms {
                return false;
            }
        }
        match (sub.qualifying.as_deref(), sup.qualifying.as_deref()) {
            (Some(sq), Some(bq)) => self.subtype(sq, bq, depth + 1),
            _ => true,
        }
    }

    // Supertype search

    /// The instantiation of `target` that `ty` inherits
    pub fn supertype(&self, ty: &ProducedType, target: DeclId) -> Option<ProducedType> {
        self.search(ty, target, 0).found()
    }

    pub fn supertype_search(&self, ty: &ProducedType, target: DeclId) -> SupertypeSearch {
        self.search(ty, target, 0)
    }

    fn search(&self, ty: &ProducedType, target: DeclId, depth: usize) -> SupertypeSearch {
        if depth > MAX_DEPTH {
            return SupertypeSearch::Missing;
        }
        let ty = self.unalias(ty);
        match ty.as_ref() {
            ProducedType::Declared(applied) if applied.decl == target => {
                SupertypeSearch::Found(ty.as_ref().clone())
            }
            ProducedType::Parameter(p) if *p == target => {
                SupertypeSearch::Found(ty.as_ref().clone())
            }
            ProducedType::Declared(applied) => {
                self.search_all(&self.direct_supertypes(applied), target, depth)
            }
            ProducedType::Parameter(p) => self.search_all(self.satisfied_types(*p), target, depth),
            ProducedType::Intersection(types) => self.search_all(types, target, depth),
            ProducedType::Union(cases) => {
                let mut joined: Option<ProducedType> = None;
                for case in cases {
                    match self.search(case, target, depth + 1) {
                        SupertypeSearch::Found(found) => {
                            joined = Some(match joined {
                                None => found,
                                Some(prev) => match self.join_instantiations(&prev, &found) {
                                    Some(j) => j,
                                    None => return SupertypeSearch::Ambiguous(prev, found),
                                },
                            });
                        }
                        other => return other,
                    }
                }
                joined.map_or(SupertypeSearch::Missing, SupertypeSearch::Found)
            }
            ProducedType::Nothing | ProducedType::Unknown => SupertypeSearch::Missing,
        }
    }

    /// Search each of `types`, meeting the instantiations found
    fn search_all(&self, types: &[ProducedType], target: DeclId, depth: usize) -> SupertypeSearch {
        let mut met: Option<ProducedType> = None;
        for ty in types {
            match self.search(ty, target, depth + 1) {
                SupertypeSearch::Found(found) => {
                    met = Some(match met {
                        None => found,
                        Some(prev) => match self.meet_instantiations(&prev, &found) {
                            Some(m) => m,
                            None => return SupertypeSearch::Ambiguous(prev, found),
                        },
                    });
                }
                SupertypeSearch::Missing => {}
                ambiguous => return ambiguous,
            }
        }
        met.map_or(SupertypeSearch::Missing, SupertypeSearch::Found)
    }

    /// Principal instantiation of a type inheriting both `a` and `b`
    fn meet_instantiations(&self, a: &ProducedType, b: &ProducedType) -> Option<ProducedType> {
        self.combine_instantiations(a, b, true)
    }

    /// Instantiation inherited by every case of a union with cases `a` and `b`
    fn join_instantiations(&self, a: &ProducedType, b: &ProducedType) -> Option<ProducedType> {
        self.combine_instantiations(a, b, false)
    }

    fn combine_instantiations(
        &self,
        a: &ProducedType,
        b: &ProducedType,
        meet: bool,
    ) -> Option<ProducedType> {
        if a == b {
            return Some(a.clone());
        }
        let (ProducedType::Declared(x), ProducedType::Declared(y)) = (a, b) else {
            return self.is_exactly(a, b).then(|| a.clone());
        };
        if x.decl != y.decl {
            return None;
        }
        if !x.use_site.is_empty() || !y.use_site.is_empty() {
            return self.is_exactly(a, b).then(|| a.clone());
        }
        let params = self.type_parameters(x.decl);
        let mut args = Vec::with_capacity(x.args.len());
        let mut use_site = Vec::new();
        for (i, (xa, ya)) in x.args.iter().zip(&y.args).enumerate() {
            let variance = params
                .get(i)
                .map(|p| self.variance(*p))
                .unwrap_or(Variance::Invariant);
            let arg = match (variance, meet) {
                (Variance::Covariant, true) | (Variance::Contravariant, false) => {
                    self.intersection2(xa.clone(), ya.clone())
                }
                (Variance::Covariant, false) | (Variance::Contravariant, true) => {
                    self.union2(xa.clone(), ya.clone())
                }
                (Variance::Invariant, _) if self.is_exactly(xa, ya) => xa.clone(),
                (Variance::Invariant, true) => return None,
                (Variance::Invariant, false) => {
                    // List<A>|List<B> inherits List<out A|B>
                    use_site.resize(x.args.len(), None);
                    use_site[i] = Some(Variance::Covariant);
                    self.union2(xa.clone(), ya.clone())
                }
            };
            args.push(arg);
        }
        let qualifying = match (x.qualifying.as_deref(), y.qualifying.as_deref()) {
            (Some(xq), Some(yq)) => Some(Box::new(self.combine_instantiations(xq, yq, meet)?)),
            (q, _) => q.cloned().map(Box::new),
        };
        Some(ProducedType::Declared(AppliedType {
            decl: x.decl,
            args,
            use_site,
            qualifying,
        }))
    }

    /// Extended and satisfied types of an applied class or interface,
    /// substituted with its arguments
    pub fn direct_supertypes(&self, applied: &AppliedType) -> Vec<ProducedType> {
        let declared = self.declared_supertypes(applied.decl);
        if declared.is_empty() {
            return declared;
        }
        let map = self.type_arg_map(applied);
        declared.iter().map(|st| self.substitute(st, &map)).collect()
    }

    /// Supertypes as written on the declaration; classes without an
    /// extended type extend `Basic`, interfaces without satisfied types
    /// satisfy `Object`
    pub fn declared_supertypes(&self, decl: DeclId) -> Vec<ProducedType> {
        let Some(ci) = self.class_or_interface(decl) else {
            return Vec::new();
        };
        let lang = self.lang();
        let mut supertypes = Vec::with_capacity(ci.satisfied.len() + 1);
        if self.is_class(decl) {
            match &ci.extended {
                Some(ext) => supertypes.push(ext.clone()),
                None if decl != lang.anything && decl != lang.basic => {
                    supertypes.push(ProducedType::simple(lang.basic))
                }
                None => {}
            }
        } else if ci.satisfied.is_empty() {
            supertypes.push(ProducedType::simple(lang.object));
        }
        supertypes.extend(ci.satisfied.iter().cloned());
        supertypes
    }

    /// Every class and interface instantiation `ty` inherits, including
    /// itself, one per declaration
    pub fn all_supertypes(&self, ty: &ProducedType) -> Vec<ProducedType> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.collect_supertypes(ty, &mut seen, &mut out, 0);
        out
    }

    fn collect_supertypes(
        &self,
        ty: &ProducedType,
        seen: &mut HashSet<DeclId>,
        out: &mut Vec<ProducedType>,
        depth: usize,
    ) {
        if depth > MAX_DEPTH {
            return;
        }
        let ty = self.unalias(ty);
        match ty.as_ref() {
            ProducedType::Declared(applied) => {
                if !seen.insert(applied.decl) {
                    return;
                }
                out.push(ty.as_ref().clone());
                for st in self.direct_supertypes(applied) {
                    self.collect_supertypes(&st, seen, out, depth + 1);
                }
            }
            ProducedType::Intersection(types) => {
                for t in types {
                    self.collect_supertypes(t, seen, out, depth + 1);
                }
            }
            ProducedType::Parameter(p) => {
                for bound in self.satisfied_types(*p) {
                    self.collect_supertypes(bound, seen, out, depth + 1);
                }
            }
            ProducedType::Union(_) | ProducedType::Nothing | ProducedType::Unknown => {}
        }
    }

    /// Declaration-level inheritance
    pub fn inherits(&self, decl: DeclId, ancestor: DeclId) -> bool {
        self.inherits_at(decl, ancestor, 0)
    }

    fn inherits_at(&self, decl: DeclId, ancestor: DeclId, depth: usize) -> bool {
        if decl == ancestor {
            return true;
        }
        if depth > MAX_DEPTH {
            return false;
        }
        if let Some(tp) = self.type_parameter(decl) {
            return tp.satisfied.iter().any(|b| {
                b.declaration()
                    .is_some_and(|d| self.inherits_at(d, ancestor, depth + 1))
            });
        }
        self.declared_supertypes(decl).iter().any(|st| {
            match self.unalias(st).as_ref() {
                ProducedType::Declared(applied) => self.inherits_at(applied.decl, ancestor, depth + 1),
                _ => false,
            }
        })
    }

    // Disjointness

    /// Check whether no value can be an instance of both types
    pub fn is_disjoint(&self, a: &ProducedType, b: &ProducedType) -> bool {
        self.disjoint(a, b, 0)
    }

    fn disjoint(&self, a: &ProducedType, b: &ProducedType, depth: usize) -> bool {
        if depth > MAX_DEPTH {
            return false;
        }
        if a.is_nothing() || b.is_nothing() {
            return true;
        }
        let a = self.unalias(a);
        let b = self.unalias(b);
        let (a, b) = (a.as_ref(), b.as_ref());
        match (a, b) {
            (ProducedType::Unknown, _) | (_, ProducedType::Unknown) => return false,
            (ProducedType::Union(cases), other) | (other, ProducedType::Union(cases)) => {
                return cases.iter().all(|c| self.disjoint(c, other, depth + 1));
            }
            (ProducedType::Intersection(types), other) | (other, ProducedType::Intersection(types)) => {
                return types.iter().any(|t| self.disjoint(t, other, depth + 1));
            }
            _ => {}
        }
        if self.is_subtype_of(a, b) || self.is_subtype_of(b, a) {
            return false;
        }
        let (ProducedType::Declared(x), ProducedType::Declared(y)) = (a, b) else {
            // type parameters may be instantiated with anything
            return self.parameter_disjoint(a, b, depth);
        };
        if self.cases_disjoint(x, b, depth) || self.cases_disjoint(y, a, depth) {
            return true;
        }
        let (xd, yd) = (x.decl, y.decl);
        if self.is_class(xd) && self.is_class(yd) && !self.inherits(xd, yd) && !self.inherits(yd, xd)
        {
            return true;
        }
        (self.is_final(xd) && !self.inherits(xd, yd)) || (self.is_final(yd) && !self.inherits(yd, xd))
    }

    /// A type parameter with enumerated cases is disjoint from a type
    /// disjoint from each case
    fn parameter_disjoint(&self, a: &ProducedType, b: &ProducedType, depth: usize) -> bool {
        let cases_of = |t: &ProducedType| match t {
            ProducedType::Parameter(p) => self.case_types(*p).to_vec(),
            _ => Vec::new(),
        };
        let (ca, cb) = (cases_of(a), cases_of(b));
        (!ca.is_empty() && ca.iter().all(|c| self.disjoint(c, b, depth + 1)))
            || (!cb.is_empty() && cb.iter().all(|c| self.disjoint(c, a, depth + 1)))
    }

    fn cases_disjoint(&self, applied: &AppliedType, other: &ProducedType, depth: usize) -> bool {
        let cases = self.applied_cases(applied);
        !cases.is_empty() && cases.iter().all(|c| self.disjoint(c, other, depth + 1))
    }

    /// Enumerated cases of an applied declaration, substituted with its
    /// arguments; self-type cases are skipped
    pub fn applied_cases(&self, applied: &AppliedType) -> Vec<ProducedType> {
        let cases = self.case_types(applied.decl);
        if cases.is_empty() || self.self_type(applied.decl).is_some() {
            return Vec::new();
        }
        let map = self.type_arg_map(applied);
        cases.iter().map(|c| self.substitute(c, &map)).collect()
    }

    // Case algebra

    /// Check whether the cases of `cover` account for every value of `ty`
    pub fn covers(&self, cover: &ProducedType, ty: &ProducedType) -> bool {
        self.covers_at(cover, ty, 0)
    }

    fn covers_at(&self, cover: &ProducedType, ty: &ProducedType, depth: usize) -> bool {
        if depth > MAX_DEPTH {
            return false;
        }
        if self.is_subtype_of(ty, cover) {
            return true;
        }
        let ty = self.unalias(ty);
        match ty.as_ref() {
            ProducedType::Union(cases) => cases.iter().all(|c| self.covers_at(cover, c, depth + 1)),
            ProducedType::Intersection(types) => {
                types.iter().any(|t| self.covers_at(cover, t, depth + 1))
            }
            ProducedType::Declared(applied) => {
                let cases = self.applied_cases(applied);
                !cases.is_empty() && cases.iter().all(|c| self.covers_at(cover, c, depth + 1))
            }
            ProducedType::Parameter(p) => {
                let cases = self.case_types(*p);
                if !cases.is_empty() {
                    cases.iter().all(|c| self.covers_at(cover, c, depth + 1))
                } else {
                    self.satisfied_types(*p)
                        .iter()
                        .any(|b| self.covers_at(cover, b, depth + 1))
                }
            }
            ProducedType::Nothing | ProducedType::Unknown => true,
        }
    }

    /// `ty` with the values of `subtracted` removed, as far as the case
    /// structure allows
    pub fn minus(&self, ty: &ProducedType, subtracted: &ProducedType) -> ProducedType {
        self.minus_at(ty, subtracted, 0)
    }

    fn minus_at(&self, ty: &ProducedType, subtracted: &ProducedType, depth: usize) -> ProducedType {
        if ty.is_unknown() || subtracted.is_unknown() {
            return ty.clone();
        }
        if self.is_subtype_of(ty, subtracted) {
            return ProducedType::Nothing;
        }
        if depth > MAX_DEPTH {
            return ty.clone();
        }
        let resolved = self.unalias(ty);
        match resolved.as_ref() {
            ProducedType::Union(cases) => {
                self.union(cases.iter().map(|c| self.minus_at(c, subtracted, depth + 1)))
            }
            ProducedType::Declared(applied) => {
                let cases = self.applied_cases(applied);
                let expand = cases.iter().any(|c| {
                    self.is_subtype_of(c, subtracted)
                        || (self.has_cases(c) && !self.is_disjoint(c, subtracted))
                });
                if expand {
                    self.union(cases.iter().map(|c| self.minus_at(c, subtracted, depth + 1)))
                } else {
                    ty.clone()
                }
            }
            ProducedType::Intersection(types) => {
                // (A&B) - S: subtract from the first conjunct with cases
                let mut types = types.clone();
                if let Some(i) = types.iter().position(|t| self.has_cases(t)) {
                    let reduced = self.minus_at(&types[i], subtracted, depth + 1);
                    types[i] = reduced;
                    self.intersection(types)
                } else {
                    ty.clone()
                }
            }
            ProducedType::Parameter(_) | ProducedType::Nothing | ProducedType::Unknown => ty.clone(),
        }
    }

    fn has_cases(&self, ty: &ProducedType) -> bool {
        match self.unalias(ty).as_ref() {
            ProducedType::Declared(applied) => !self.applied_cases(applied).is_empty(),
            ProducedType::Union(_) => true,
            _ => false,
        }
    }

    /// Recursively expand enumerated cases
    pub fn union_of_cases(&self, ty: &ProducedType) -> ProducedType {
        self.union_of_cases_at(ty, 0)
    }

    fn union_of_cases_at(&self, ty: &ProducedType, depth: usize) -> ProducedType {
        if depth > MAX_DEPTH {
            return ty.clone();
        }
        let resolved = self.unalias(ty);
        match resolved.as_ref() {
            ProducedType::Union(cases) => {
                self.union(cases.iter().map(|c| self.union_of_cases_at(c, depth + 1)))
            }
            ProducedType::Declared(applied) => {
                let cases = self.applied_cases(applied);
                if cases.is_empty() {
                    ty.clone()
                } else {
                    self.union(cases.iter().map(|c| self.union_of_cases_at(c, depth + 1)))
                }
            }
            ProducedType::Parameter(p) if !self.case_types(*p).is_empty() => self.union(
                self.case_types(*p)
                    .iter()
                    .map(|c| self.union_of_cases_at(c, depth + 1)),
            ),
            _ => ty.clone(),
        }
    }

    /// The type with aliases expanded and anonymous local classes replaced
    /// by the intersection of their supertypes
    pub fn denotable(&self, ty: &ProducedType) -> ProducedType {
        let resolved = self.resolve_aliases(ty);
        self.denotable_at(&resolved, 0)
    }

    fn denotable_at(&self, ty: &ProducedType, depth: usize) -> ProducedType {
        if depth > MAX_DEPTH {
            return ty.clone();
        }
        match ty {
            ProducedType::Declared(applied) => {
                if self.is_anonymous(applied.decl) && !self.is_toplevel(applied.decl) {
                    let supertypes = self.direct_supertypes(applied);
                    return self.intersection(
                        supertypes.iter().map(|st| self.denotable_at(st, depth + 1)),
                    );
                }
                ProducedType::Declared(AppliedType {
                    decl: applied.decl,
                    args: applied
                        .args
                        .iter()
                        .map(|a| self.denotable_at(a, depth + 1))
                        .collect(),
                    use_site: applied.use_site.clone(),
                    qualifying: applied.qualifying.clone(),
                })
            }
            ProducedType::Union(cases) => {
                self.union(cases.iter().map(|c| self.denotable_at(c, depth + 1)))
            }
            ProducedType::Intersection(types) => {
                self.intersection(types.iter().map(|t| self.denotable_at(t, depth + 1)))
            }
            _ => ty.clone(),
        }
    }

    // Optional and sequence helpers

    /// `Null` is a subtype of the type
    pub fn is_optional(&self, ty: &ProducedType) -> bool {
        !ty.is_unknown() && self.is_subtype_of(&self.null_type(), ty)
    }

    /// The type without `Null`
    pub fn definite(&self, ty: &ProducedType) -> ProducedType {
        self.intersection2(self.object_type(), ty.clone())
    }

    /// `Empty` is a subtype of the type
    pub fn is_possibly_empty(&self, ty: &ProducedType) -> bool {
        !ty.is_unknown() && self.is_subtype_of(&self.empty_type(), ty)
    }

    /// The type is a subtype of `Empty`
    pub fn is_empty_type(&self, ty: &ProducedType) -> bool {
        !ty.is_unknown() && !ty.is_nothing() && self.is_subtype_of(ty, &self.empty_type())
    }

    pub fn is_sequential(&self, ty: &ProducedType) -> bool {
        self.supertype(ty, self.lang().sequential).is_some()
    }

    /// Element type of the `Sequential` supertype
    pub fn sequential_element_type(&self, ty: &ProducedType) -> Option<ProducedType> {
        self.supertype(ty, self.lang().sequential)
            .and_then(|st| st.arg(0).cloned())
    }

    /// The type without `Null` or `Empty`
    pub fn nonempty(&self, ty: &ProducedType) -> ProducedType {
        let definite = self.definite(ty);
        match self.sequential_element_type(&definite) {
            Some(element) => self.intersection2(self.sequence_type(element), definite),
            None => definite,
        }
    }

    /// Element type of the `Iterable` supertype
    pub fn iterated_type(&self, ty: &ProducedType) -> Option<ProducedType> {
        self.supertype(ty, self.lang().iterable)
            .and_then(|st| st.arg(0).cloned())
    }

    /// `Absent` argument of the `Iterable` supertype
    pub fn absent_type(&self, ty: &ProducedType) -> Option<ProducedType> {
        self.supertype(ty, self.lang().iterable)
            .and_then(|st| st.arg(1).cloned())
    }

    /// An iterable whose `Absent` argument is `Nothing`
    pub fn is_nonempty_iterable(&self, ty: &ProducedType) -> bool {
        self.absent_type(ty).is_some_and(|a| a.is_nothing())
    }
}
