use super::declaration_of;
use crate::runtime::{
    attribute::{
        AttributeRef, CloningAttribute, MethodAttribute, MixinAttribute, ReifierMethodAttribute,
        VariableGetAttribute, VariableSetAttribute, ViewAttribute,
    },
    bootstrap::roots,
    category::Category,
    client::ReifierClient,
    context::Context,
    error::{AgoraError, AgoraResult},
    generator::{Generator, GeneratorRef},
    identity::IdentityGenerator,
    native::{null, up, NativeValue},
    object::AgoraObject,
    pattern::{Declaration, Pattern},
    variable::VariableContainer,
};
use std::rc::Rc;
use tracing::debug;

pub(super) fn self_object(client: &ReifierClient) -> AgoraResult<AgoraObject> {
    client.forbid_receiver("SELF")?;
    Ok(client.caller().self_object())
}

pub(super) fn object(client: &ReifierClient) -> AgoraResult<AgoraObject> {
    client.forbid_receiver("OBJECT")?;
    let (object, _) = new_object(client.caller());
    Ok(object)
}

pub(super) fn object_with_body(client: &ReifierClient) -> AgoraResult<AgoraObject> {
    client.forbid_receiver("OBJECT:")?;
    let body = client.argument(0)?;
    let (object, context) = new_object(client.caller());
    body.eval(&context)?;
    Ok(object)
}

/// A fresh object whose private frame sits over the creator's private part,
/// so its methods see the lexical scope it was created in. The returned
/// context is the one its body runs in.
fn new_object(caller: &Context) -> (AgoraObject, Context) {
    let roots = roots();
    let private = Generator::object_frame(caller.private().clone());
    let public = Generator::layer(roots.parent.clone(), private.clone());
    let identity = IdentityGenerator::user(public.clone());
    let context = Context::new(
        identity.clone(),
        private,
        public,
        roots.parent.clone(),
        Category::MIXIN,
        caller.handler().cloned(),
    );
    (AgoraObject::from_identity(identity), context)
}

pub(super) fn public(client: &ReifierClient) -> AgoraResult<AgoraObject> {
    modifier(client, "PUBLIC", Category::PUBLIK)
}

pub(super) fn local(client: &ReifierClient) -> AgoraResult<AgoraObject> {
    modifier(client, "LOCAL", Category::LOCAL)
}

fn modifier(client: &ReifierClient, name: &str, bit: Category) -> AgoraResult<AgoraObject> {
    if !client.caller().category().contains(Category::FLAGS) {
        return Err(AgoraError::reifier_misused(format!(
            "`{name}` only qualifies the pattern of a declaration"
        )));
    }
    let declaration = declaration_of(client, name)?;
    if !declaration.category.contains_less_than(Category::EMPTY) {
        return Err(AgoraError::reifier_misused(format!(
            "`{name}` applied to `{declaration}`, which already carries a modifier"
        )));
    }
    let qualified = (*declaration).clone().with_category(bit);
    Ok(up(NativeValue::Declaration(Rc::new(qualified))))
}

/// Generators a declaration installs into, checked before anything is
/// installed. Public declarations go to the public part and the private
/// part, everything else only to the private part.
fn targets(
    client: &ReifierClient,
    declaration: &Declaration,
    reifier: &str,
    allowed: Category,
) -> AgoraResult<Vec<GeneratorRef>> {
    if !declaration.category.contains_less_than(allowed) {
        return Err(AgoraError::reifier_misused(format!(
            "`{reifier}` does not accept the modifiers of `{declaration}`"
        )));
    }
    let caller = client.caller();
    if roots().is_root_private(caller.private()) {
        return Err(AgoraError::program(format!(
            "cannot declare `{declaration}` in the root private part"
        )));
    }
    if !declaration.is_public() {
        return Ok(vec![caller.private().clone()]);
    }
    if !caller.category().contains(Category::MIXIN) {
        return Err(AgoraError::reifier_misused(format!(
            "public declaration `{declaration}` outside an object body"
        )));
    }
    Ok(vec![caller.public().clone(), caller.private().clone()])
}

fn install_all(
    targets: &[GeneratorRef],
    pattern: &Pattern,
    attribute: AttributeRef,
) -> AgoraResult<()> {
    for target in targets {
        target.install(pattern.clone(), attribute.clone())?;
    }
    Ok(())
}

pub(super) fn variable(client: &ReifierClient) -> AgoraResult<AgoraObject> {
    let declaration = declaration_of(client, "VARIABLE:")?;
    let targets = targets(
        client,
        &declaration,
        "VARIABLE:",
        Category::PUBLIK | Category::LOCAL,
    )?;
    let setter = declaration.pattern.setter().ok_or_else(|| {
        AgoraError::reifier_misused(format!(
            "variable `{declaration}` must be declared with a unary pattern"
        ))
    })?;
    let value = client.eval_argument(0)?;
    let container = Rc::new(VariableContainer::new(value.clone()));
    install_all(
        &targets,
        &declaration.pattern,
        Rc::new(VariableGetAttribute::new(container.clone())),
    )?;
    install_all(
        &targets,
        &setter,
        Rc::new(VariableSetAttribute::new(container)),
    )?;
    debug!(%declaration, "declared variable");
    Ok(value)
}

pub(super) fn method(client: &ReifierClient) -> AgoraResult<AgoraObject> {
    let declaration = declaration_of(client, "METHOD:")?;
    let targets = targets(
        client,
        &declaration,
        "METHOD:",
        Category::PUBLIK | Category::LOCAL,
    )?;
    let body = client.argument(0)?.clone();
    let attribute = Rc::new(MethodAttribute::new(declaration.formals.clone(), body));
    install_all(&targets, &declaration.pattern, attribute)?;
    Ok(null())
}

pub(super) fn mixin(client: &ReifierClient) -> AgoraResult<AgoraObject> {
    let declaration = declaration_of(client, "MIXIN:")?;
    let targets = targets(client, &declaration, "MIXIN:", Category::PUBLIK)?;
    let body = client.argument(0)?.clone();
    let attribute = Rc::new(MixinAttribute::new(declaration.formals.clone(), body));
    install_all(&targets, &declaration.pattern, attribute)?;
    Ok(null())
}

pub(super) fn view(client: &ReifierClient) -> AgoraResult<AgoraObject> {
    let declaration = declaration_of(client, "VIEW:")?;
    let targets = targets(client, &declaration, "VIEW:", Category::PUBLIK)?;
    let body = client.argument(0)?.clone();
    let attribute = Rc::new(ViewAttribute::new(declaration.formals.clone(), body));
    install_all(&targets, &declaration.pattern, attribute)?;
    Ok(null())
}

pub(super) fn cloning(client: &ReifierClient) -> AgoraResult<AgoraObject> {
    let declaration = declaration_of(client, "CLONING:")?;
    let targets = targets(client, &declaration, "CLONING:", Category::PUBLIK)?;
    let body = client.argument(0)?.clone();
    let attribute = Rc::new(CloningAttribute::new(declaration.formals.clone(), body));
    install_all(&targets, &declaration.pattern, attribute)?;
    Ok(null())
}

/// `pattern REIFIER: ctx IS: body` installs under the upper-cased form of
/// `pattern`, which is how call sites spell it.
pub(super) fn reifier(client: &ReifierClient) -> AgoraResult<AgoraObject> {
    let declaration = declaration_of(client, "REIFIER:IS:")?;
    let targets = targets(
        client,
        &declaration,
        "REIFIER:IS:",
        Category::PUBLIK | Category::LOCAL,
    )?;
    let context_name = client.argument(0)?.as_name().ok_or_else(|| {
        AgoraError::reifier_misused(format!(
            "the context parameter of reifier `{declaration}` must be a name"
        ))
    })?;
    let body = client.argument(1)?.clone();
    let attribute = Rc::new(ReifierMethodAttribute::new(
        declaration.formals.clone(),
        context_name.to_string(),
        body,
    ));
    install_all(&targets, &declaration.pattern.to_reifier(), attribute)?;
    Ok(null())
}
