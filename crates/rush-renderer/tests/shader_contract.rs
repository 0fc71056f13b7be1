//! Checks the compiled GLSL programs against the attribute, varying and
//! binding layout the pipelines are built for. Runs headless through naga.

use rush_renderer::shaders::{self, ShaderSource};

fn compile(source: &ShaderSource) -> naga::Module {
    match shaders::load(source) {
        Ok(module) => module,
        Err(e) => panic!("{}", e),
    }
}

fn entry_point(module: &naga::Module) -> &naga::EntryPoint {
    assert_eq!(module.entry_points.len(), 1);
    &module.entry_points[0]
}

fn input_locations(module: &naga::Module) -> Vec<u32> {
    let mut locations: Vec<u32> = entry_point(module)
        .function
        .arguments
        .iter()
        .filter_map(|arg| match arg.binding {
            Some(naga::Binding::Location { location, .. }) => Some(location),
            _ => None,
        })
        .collect();
    locations.sort();
    locations
}

fn output_bindings(module: &naga::Module) -> Vec<naga::Binding> {
    let Some(result) = &entry_point(module).function.result else {
        return Vec::new();
    };
    if let Some(binding) = &result.binding {
        return vec![binding.clone()];
    }
    match &module.types[result.ty].inner {
        naga::TypeInner::Struct { members, .. } => {
            members.iter().filter_map(|m| m.binding.clone()).collect()
        }
        _ => Vec::new(),
    }
}

fn output_locations(module: &naga::Module) -> Vec<u32> {
    let mut locations: Vec<u32> = output_bindings(module)
        .into_iter()
        .filter_map(|b| match b {
            naga::Binding::Location { location, .. } => Some(location),
            _ => None,
        })
        .collect();
    locations.sort();
    locations
}

fn writes_position(module: &naga::Module) -> bool {
    output_bindings(module).iter().any(|b| {
        matches!(
            b,
            naga::Binding::BuiltIn(naga::BuiltIn::Position { .. })
        )
    })
}

fn block_has_kill(block: &naga::Block) -> bool {
    block.iter().any(|statement| match statement {
        naga::Statement::Kill => true,
        naga::Statement::Block(inner) => block_has_kill(inner),
        naga::Statement::If { accept, reject, .. } => {
            block_has_kill(accept) || block_has_kill(reject)
        }
        naga::Statement::Loop {
            body, continuing, ..
        } => block_has_kill(body) || block_has_kill(continuing),
        naga::Statement::Switch { cases, .. } => cases.iter().any(|c| block_has_kill(&c.body)),
        _ => false,
    })
}

fn has_discard(module: &naga::Module) -> bool {
    module
        .functions
        .iter()
        .any(|(_, f)| block_has_kill(&f.body))
        || module
            .entry_points
            .iter()
            .any(|ep| block_has_kill(&ep.function.body))
}

fn global_binding(module: &naga::Module, name: &str) -> Option<(u32, u32)> {
    module.global_variables.iter().find_map(|(_, var)| {
        if var.name.as_deref() == Some(name) {
            var.binding.as_ref().map(|b| (b.group, b.binding))
        } else {
            None
        }
    })
}

/// Every function body, including entry-point wrappers
fn functions(module: &naga::Module) -> Vec<&naga::Function> {
    module
        .functions
        .iter()
        .map(|(_, f)| f)
        .chain(module.entry_points.iter().map(|ep| &ep.function))
        .collect()
}

fn statements(block: &naga::Block) -> Vec<&naga::Statement> {
    let mut out = Vec::new();
    for statement in block.iter() {
        out.push(statement);
        match statement {
            naga::Statement::Block(inner) => out.extend(statements(inner)),
            naga::Statement::If { accept, reject, .. } => {
                out.extend(statements(accept));
                out.extend(statements(reject));
            }
            naga::Statement::Loop {
                body, continuing, ..
            } => {
                out.extend(statements(body));
                out.extend(statements(continuing));
            }
            naga::Statement::Switch { cases, .. } => {
                for case in cases {
                    out.extend(statements(&case.body));
                }
            }
            _ => {}
        }
    }
    out
}

/// Name of the global or local variable an expression reads from
fn source_name(
    module: &naga::Module,
    function: &naga::Function,
    expr: naga::Handle<naga::Expression>,
) -> Option<String> {
    match &function.expressions[expr] {
        naga::Expression::GlobalVariable(h) => module.global_variables[*h].name.clone(),
        naga::Expression::LocalVariable(h) => function.local_variables[*h].name.clone(),
        naga::Expression::Load { pointer } => source_name(module, function, *pointer),
        naga::Expression::AccessIndex { base, .. } => source_name(module, function, *base),
        naga::Expression::Swizzle { vector, .. } => source_name(module, function, *vector),
        _ => None,
    }
}

/// Vector width of the variable behind a pointer expression
fn variable_width(
    module: &naga::Module,
    function: &naga::Function,
    pointer: naga::Handle<naga::Expression>,
) -> Option<u32> {
    let ty = match &function.expressions[pointer] {
        naga::Expression::GlobalVariable(h) => module.global_variables[*h].ty,
        naga::Expression::LocalVariable(h) => function.local_variables[*h].ty,
        _ => return None,
    };
    match module.types[ty].inner {
        naga::TypeInner::Vector { size, .. } => Some(size as u32),
        naga::TypeInner::Scalar(_) => Some(1),
        _ => None,
    }
}

fn literal_value(module: &naga::Module, expr: &naga::Expression) -> Option<f64> {
    match expr {
        naga::Expression::Literal(naga::Literal::F32(v)) => Some(*v as f64),
        naga::Expression::Literal(naga::Literal::F64(v)) => Some(*v),
        naga::Expression::Literal(naga::Literal::AbstractFloat(v)) => Some(*v),
        naga::Expression::Constant(h) => {
            literal_value(module, &module.global_expressions[module.constants[*h].init])
        }
        _ => None,
    }
}

/// One scalar lane of a vector value
#[derive(Debug, Clone, PartialEq)]
enum Lane {
    Literal(f32),
    /// Component `index` of the named variable
    Read(String, u32),
    Other,
}

fn read(name: &str, index: u32) -> Lane {
    Lane::Read(name.to_string(), index)
}

/// Break a value expression into its scalar lanes
fn lanes(
    module: &naga::Module,
    function: &naga::Function,
    expr: naga::Handle<naga::Expression>,
) -> Vec<Lane> {
    let expression = &function.expressions[expr];
    if let Some(value) = literal_value(module, expression) {
        return vec![Lane::Literal(value as f32)];
    }

    let named = |index: u32| match source_name(module, function, expr) {
        Some(name) => Lane::Read(name, index),
        None => Lane::Other,
    };

    match expression {
        naga::Expression::Compose { components, .. } => components
            .iter()
            .flat_map(|c| lanes(module, function, *c))
            .collect(),
        naga::Expression::Swizzle { size, pattern, .. } => pattern[..*size as usize]
            .iter()
            .map(|c| named(*c as u32))
            .collect(),
        naga::Expression::AccessIndex { base, index } => {
            // A value that was swizzled first keeps the swizzle's lane mapping
            match &function.expressions[*base] {
                naga::Expression::Swizzle { pattern, .. } => {
                    vec![named(pattern[*index as usize] as u32)]
                }
                _ => vec![named(*index)],
            }
        }
        naga::Expression::Load { pointer } => match &function.expressions[*pointer] {
            naga::Expression::AccessIndex { index, .. } => vec![named(*index)],
            _ => match variable_width(module, function, *pointer) {
                Some(width) => (0..width).map(&named).collect(),
                None => vec![Lane::Other],
            },
        },
        _ => vec![Lane::Other],
    }
}

/// Lanes of the value the shader stores into a named global
fn stored_lanes(module: &naga::Module, name: &str) -> Vec<Lane> {
    for function in functions(module) {
        for statement in statements(&function.body) {
            if let naga::Statement::Store { pointer, value } = statement {
                let target = match &function.expressions[*pointer] {
                    naga::Expression::GlobalVariable(h) => {
                        module.global_variables[*h].name.as_deref()
                    }
                    _ => None,
                };
                if target == Some(name) {
                    return lanes(module, function, *value);
                }
            }
        }
    }
    panic!("no store to {}", name);
}

/// Lanes on each side of the condition guarding the discard
fn discard_condition(module: &naga::Module) -> (naga::BinaryOperator, Vec<Lane>, Vec<Lane>) {
    for function in functions(module) {
        for statement in statements(&function.body) {
            let naga::Statement::If { condition, accept, .. } = statement else {
                continue;
            };
            if !block_has_kill(accept) {
                continue;
            }
            let naga::Expression::Binary { op, left, right } = &function.expressions[*condition]
            else {
                panic!("discard guarded by a non-comparison");
            };
            return (
                *op,
                lanes(module, function, *left),
                lanes(module, function, *right),
            );
        }
    }
    panic!("no conditional discard");
}

fn samples_texture(module: &naga::Module, name: &str) -> bool {
    functions(module).iter().any(|function| {
        function.expressions.iter().any(|(_, expr)| match expr {
            naga::Expression::ImageSample { image, .. } => {
                source_name(module, function, *image).as_deref() == Some(name)
            }
            _ => false,
        })
    })
}

#[test]
fn text_vertex_reads_one_attribute_and_emits_tex_coords() {
    let module = compile(&shaders::TEXT_VERTEX);
    assert_eq!(entry_point(&module).stage, naga::ShaderStage::Vertex);
    assert_eq!(entry_point(&module).name, shaders::ENTRY_POINT);
    assert_eq!(input_locations(&module), vec![0]);
    assert_eq!(output_locations(&module), vec![0]);
    assert!(writes_position(&module));
}

#[test]
fn color_vertex_reads_position_and_color() {
    let module = compile(&shaders::COLOR_VERTEX);
    assert_eq!(entry_point(&module).stage, naga::ShaderStage::Vertex);
    assert_eq!(input_locations(&module), vec![0, 1]);
    assert_eq!(output_locations(&module), vec![0]);
    assert!(writes_position(&module));
}

#[test]
fn text_fragment_binds_text_and_discards() {
    let module = compile(&shaders::TEXT_FRAGMENT);
    assert_eq!(entry_point(&module).stage, naga::ShaderStage::Fragment);
    assert_eq!(global_binding(&module, "text"), Some((0, 0)));
    assert_eq!(global_binding(&module, "text_sampler"), Some((0, 1)));
    assert_eq!(input_locations(&module), vec![0]);
    assert!(has_discard(&module));
}

#[test]
fn color_fragment_never_discards() {
    let module = compile(&shaders::COLOR_FRAGMENT);
    assert_eq!(entry_point(&module).stage, naga::ShaderStage::Fragment);
    assert_eq!(input_locations(&module), vec![0]);
    assert!(!has_discard(&module));
}

#[test]
fn text_vertex_places_xy_at_depth_zero() {
    let module = compile(&shaders::TEXT_VERTEX);
    assert_eq!(
        stored_lanes(&module, "gl_Position"),
        vec![
            read("vertex", 0),
            read("vertex", 1),
            Lane::Literal(0.0),
            Lane::Literal(1.0)
        ]
    );
}

#[test]
fn text_vertex_forwards_zw_as_tex_coords() {
    let module = compile(&shaders::TEXT_VERTEX);
    assert_eq!(
        stored_lanes(&module, "tex_coords"),
        vec![read("vertex", 2), read("vertex", 3)]
    );
}

#[test]
fn color_vertex_extends_position_with_unit_w() {
    let module = compile(&shaders::COLOR_VERTEX);
    assert_eq!(
        stored_lanes(&module, "gl_Position"),
        vec![
            read("position", 0),
            read("position", 1),
            read("position", 2),
            Lane::Literal(1.0)
        ]
    );
}

#[test]
fn color_vertex_passes_color_through() {
    let module = compile(&shaders::COLOR_VERTEX);
    assert_eq!(
        stored_lanes(&module, "vertex_color"),
        vec![read("color", 0), read("color", 1), read("color", 2)]
    );
}

#[test]
fn text_fragment_discards_below_alpha_cutoff() {
    let module = compile(&shaders::TEXT_FRAGMENT);
    let (op, left, right) = discard_condition(&module);
    assert_eq!(op, naga::BinaryOperator::Less);
    assert_eq!(left, vec![read("sampled", 3)]);
    assert_eq!(right, vec![Lane::Literal(shaders::ALPHA_CUTOFF)]);
}

#[test]
fn text_fragment_outputs_the_sample_unchanged() {
    let module = compile(&shaders::TEXT_FRAGMENT);
    assert!(samples_texture(&module, "text"));
    assert_eq!(
        stored_lanes(&module, "frag_color"),
        (0..4).map(|i| read("sampled", i)).collect::<Vec<_>>()
    );
}
