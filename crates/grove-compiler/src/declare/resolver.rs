//! Declaration evaluation in phases.
//!
//! 1. Data types, then aliases, in one fixpoint over forward references.
//!    Data types are queued first, so a parameter bound may name an alias.
//! 2. Constructors and keyword parameters.
//!
//! A declaration whose types are not declared yet goes to the back of the
//! queue. The countdown is the number of trials left without progress: when
//! it runs out, the remaining declarations reference each other in a cycle or
//! reference a type that is never declared, and the last failure is reported.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use super::model::{
    AliasDecl, DataAbstractDecl, DataDecl, Declaration, KeywordFormal, TypeExpr, UserType,
};
use super::types::{Field, KeywordOwner, KeywordParameter, Type, TypeStore};
use crate::Result;
use crate::error::Error;

/// Type name waiting for its references to be declared.
#[derive(Clone, Copy)]
enum Pending<'d> {
    Adt(&'d UserType),
    Alias(&'d AliasDecl),
}

pub(super) struct Resolver<'s, S: TypeStore> {
    store: &'s mut S,
}

impl<'s, S: TypeStore> Resolver<'s, S> {
    pub(super) fn new(store: &'s mut S) -> Self {
        Self { store }
    }

    pub(super) fn evaluate(&mut self, declarations: &[Declaration]) -> Result<()> {
        let mut adts: Vec<&UserType> = Vec::new();
        let mut datas: Vec<&DataDecl> = Vec::new();
        let mut abstracts: Vec<&DataAbstractDecl> = Vec::new();
        let mut aliases: Vec<&AliasDecl> = Vec::new();
        for decl in declarations {
            match decl {
                Declaration::Data(data) => {
                    adts.push(&data.user);
                    datas.push(data);
                }
                Declaration::DataAbstract(data) => {
                    adts.push(&data.user);
                    abstracts.push(data);
                }
                Declaration::Alias(alias) => aliases.push(alias),
            }
        }

        let types: Vec<Pending<'_>> = adts
            .into_iter()
            .map(Pending::Adt)
            .chain(aliases.into_iter().map(Pending::Alias))
            .collect();
        self.fixpoint(types, |this, pending| match pending {
            Pending::Adt(user) => this.declare_adt(user).map(drop),
            Pending::Alias(alias) => this.declare_alias(alias),
        })?;
        for data in abstracts {
            let adt = self.declare_adt(&data.user)?;
            self.declare_common_keywords(&adt, &data.common_keyword_formals)?;
        }
        for data in datas {
            self.declare_constructors(data)?;
        }
        Ok(())
    }

    fn fixpoint<D: Copy>(
        &mut self,
        todo: Vec<D>,
        mut declare: impl FnMut(&mut Self, D) -> Result<()>,
    ) -> Result<()> {
        let mut todo = VecDeque::from(todo);
        let mut countdown = todo.len();
        while let Some(trial) = todo.pop_front() {
            countdown -= 1;
            match declare(self, trial) {
                Ok(()) => countdown = todo.len(),
                Err(err) if err.is_undeclared_type() && countdown > 0 => {
                    debug!(%err, pending = todo.len() + 1, "declaration requeued");
                    todo.push_back(trial);
                }
                Err(err) => {
                    if err.is_undeclared_type() {
                        debug!(%err, pending = todo.len() + 1, "no progress on declarations");
                    }
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    fn declare_adt(&mut self, user: &UserType) -> Result<Type> {
        let name = local_name(user)?;
        let parameters = self.type_parameters(user)?;
        self.store.declare_adt(name, parameters)
    }

    fn declare_alias(&mut self, alias: &AliasDecl) -> Result<()> {
        let base = self.type_of(&alias.base)?;
        let name = local_name(&alias.user)?;
        let parameters = self.type_parameters(&alias.user)?;
        self.store.declare_alias(name, parameters, base)?;
        Ok(())
    }

    fn declare_constructors(&mut self, data: &DataDecl) -> Result<()> {
        let adt = self.declare_adt(&data.user)?;
        self.declare_common_keywords(&adt, &data.common_keyword_formals)?;
        let adt_name = local_name(&data.user)?;

        let mut seen = HashSet::new();
        for variant in &data.variants {
            if !seen.insert(variant.name.as_str()) {
                return Err(Error::RedeclaredType {
                    name: variant.name.clone(),
                });
            }
            let mut fields = Vec::with_capacity(variant.arguments.len());
            for (i, arg) in variant.arguments.iter().enumerate() {
                fields.push(Field {
                    label: arg.name.clone().unwrap_or_else(|| format!("arg{i}")),
                    ty: self.type_of(&arg.ty)?,
                });
            }
            self.store.declare_constructor(&adt, &variant.name, fields)?;

            if !variant.keyword_formals.is_empty() {
                let owner = KeywordOwner::Constructor {
                    adt: adt_name.to_owned(),
                    name: variant.name.clone(),
                };
                let params = self.keyword_parameters(&variant.keyword_formals)?;
                self.store.declare_keyword_parameters(owner, params)?;
            }
        }
        Ok(())
    }

    fn declare_common_keywords(&mut self, adt: &Type, formals: &[KeywordFormal]) -> Result<()> {
        if formals.is_empty() {
            return Ok(());
        }
        let Some(name) = adt.declared_name() else {
            return Err(Error::implementation(format!(
                "keyword parameters declared for non-data type {adt}"
            )));
        };
        let owner = KeywordOwner::Adt(name.to_owned());
        let params = self.keyword_parameters(formals)?;
        self.store.declare_keyword_parameters(owner, params)
    }

    fn keyword_parameters(&self, formals: &[KeywordFormal]) -> Result<Vec<KeywordParameter>> {
        formals
            .iter()
            .map(|kw| {
                Ok(KeywordParameter {
                    name: kw.name.clone(),
                    ty: self.type_of(&kw.ty)?,
                    default: kw.default.clone(),
                })
            })
            .collect()
    }

    /// Formal parameters of a declared type. Each must be a type variable.
    fn type_parameters(&self, user: &UserType) -> Result<Vec<Type>> {
        user.parameters
            .iter()
            .map(|formal| match formal {
                TypeExpr::Variable(var) => Ok(Type::Parameter {
                    name: var.name.clone(),
                    bound: Box::new(match &var.bound {
                        Some(bound) => self.type_of(bound)?,
                        None => Type::value(),
                    }),
                }),
                _ => Err(Error::Syntax {
                    expected: "type variable".to_owned(),
                    span: user.span,
                }),
            })
            .collect()
    }

    fn type_of(&self, expr: &TypeExpr) -> Result<Type> {
        let ty = match expr {
            TypeExpr::Basic(basic) => Type::Basic(*basic),
            TypeExpr::Structured { kind, args } => Type::Structured {
                kind: *kind,
                args: args
                    .iter()
                    .map(|arg| self.type_of(&arg.ty))
                    .collect::<Result<_>>()?,
            },
            TypeExpr::User(user) => {
                let declared =
                    self.store
                        .lookup_type(&user.name)
                        .ok_or_else(|| Error::UndeclaredType {
                            name: user.name.to_string(),
                        })?;
                if user.parameters.is_empty() {
                    declared
                } else {
                    let actuals = user
                        .parameters
                        .iter()
                        .map(|p| self.type_of(p))
                        .collect::<Result<_>>()?;
                    declared.instantiate(actuals)
                }
            }
            TypeExpr::Variable(var) => Type::Parameter {
                name: var.name.clone(),
                bound: Box::new(match &var.bound {
                    Some(bound) => self.type_of(bound)?,
                    None => Type::value(),
                }),
            },
            TypeExpr::Symbol(sym) => Type::NonTerminal(sym.clone()),
        };
        Ok(ty)
    }
}

fn local_name(user: &UserType) -> Result<&str> {
    if user.name.is_qualified() {
        return Err(Error::IllegalQualifiedDeclaration {
            name: user.name.to_string(),
        });
    }
    Ok(user.name.name())
}
