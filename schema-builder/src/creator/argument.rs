use crate::annotations::Annotations;
use crate::creator::Bindings;
use crate::creator::BuildContext;
use crate::creator::Direction;
use crate::creator::field::populate_field;
use crate::error::SchemaBuilderError;
use crate::helper::naming;
use crate::index::ClassInfo;
use crate::index::MethodInfo;
use crate::index::ParameterInfo;
use crate::model::DirectiveLocation;
use crate::model::Field;

/// Creates the argument for `parameter` of the operation method `method`.
pub(crate) fn create_argument(
    ctx: &mut BuildContext<'_>,
    class: &ClassInfo,
    method: &MethodInfo,
    parameter: &ParameterInfo,
) -> Result<Field, SchemaBuilderError> {
    let member = format!("{}.{}({})", class.name, method.name, parameter.name);
    let annotations = Annotations::for_parameter(parameter);
    let (reference, wrapper) = ctx.create_reference(
        Direction::In,
        &parameter.signature,
        &annotations,
        &Bindings::new(),
        &member,
    )?;
    let mut argument = Field::new(
        &parameter.name,
        naming::field_name(&annotations, &parameter.name),
        reference,
    );
    argument.wrapper = wrapper;
    populate_field(
        ctx,
        &mut argument,
        &parameter.signature,
        &annotations,
        DirectiveLocation::ArgumentDefinition,
    )?;
    Ok(argument)
}
