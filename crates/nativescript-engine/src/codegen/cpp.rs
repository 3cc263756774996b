//! C++ glue emission.
//!
//! Every function is `extern "C" NS_EXPORT` so its symbol is exactly the
//! name computed by [`nativescript_sdk::symbol`], with no mangling.

use nativescript_sdk::{FieldInfo, MethodInfo, TypeInfo, REGISTRATION_SYMBOL};

use super::{Registration, REGISTRATION_HEADER, SUPPORT_HEADER_NAME};

/// The support header (`ns.h`) the generated glue and the annotated headers
/// include. Mirrors the `#[repr(C)]` records in `nativescript_sdk::abi`.
pub const SUPPORT_HEADER: &str = r#"#pragma once

#ifdef _WIN32
	#define NS_EXPORT __declspec(dllexport)
#else
	#define NS_EXPORT __attribute__((visibility("default")))
#endif

#define UCLASS(...)
#define USTRUCT(...)
#define UPROPERTY(...)
#define UFUNCTION(...)

class Script {
public:
	virtual ~Script() {}
	virtual void start() {}
	virtual void update() {}
};

enum ns_field_type {
	NS_UNKNOWN = 0,
	NS_INT = 1,
	NS_CHAR = 2,
	NS_BOOL = 3,
	NS_FLOAT = 4,
	NS_DOUBLE = 5,
	NS_WCHAR = 6,
	NS_VOID = 7
};

typedef struct ns_field_info {
	int type;
	const char* name;
	const char* getter;
	const char* setter;
} ns_field_info;

typedef struct ns_method_info {
	const char* name;
	const int* parameters;
	int parameter_count;
	int return_type;
} ns_method_info;

typedef struct ns_script_info {
	const char* name;
	const ns_field_info* fields;
	int field_count;
	const ns_method_info* methods;
	int method_count;
	const char* create;
	const char* destroy;
} ns_script_info;
"#;

// ============================================================================
// Per-file glue
// ============================================================================

/// Render a generated header: the original text verbatim, then the
/// exported functions for every type declared in it.
pub fn render_header_glue(source: &str, types: &[TypeInfo]) -> String {
    let mut out = String::with_capacity(source.len() + types.len() * 512);
    out.push_str(source);

    for info in types {
        out.push('\n');
        render_type(&mut out, info);
    }

    out
}

fn render_type(out: &mut String, info: &TypeInfo) {
    let name = &info.name;

    out.push_str(&format!("extern \"C\" NS_EXPORT {}* {}() {{\n", name, info.create));
    out.push_str(&format!("\treturn new {}();\n", name));
    out.push_str("}\n\n");

    out.push_str(&format!("extern \"C\" NS_EXPORT void {}({}* x) {{\n", info.destroy, name));
    out.push_str("\tdelete x;\n");
    out.push_str("}\n");

    for field in &info.fields {
        out.push('\n');
        render_field(out, name, field);
    }
}

fn render_field(out: &mut String, type_name: &str, field: &FieldInfo) {
    let keyword = match field.ty.keyword() {
        Some(keyword) if field.ty.is_accessible() => keyword,
        _ => {
            out.push_str(&format!(
                "// nsg: {}::{} has no supported scalar type; {} and {} not generated\n",
                type_name, field.name, field.getter, field.setter
            ));
            return;
        }
    };

    out.push_str(&format!(
        "extern \"C\" NS_EXPORT {} {}({}* x) {{\n",
        keyword, field.getter, type_name
    ));
    out.push_str(&format!("\treturn x->{};\n", field.name));
    out.push_str("}\n\n");

    out.push_str(&format!(
        "extern \"C\" NS_EXPORT void {}({}* x, {} v) {{\n",
        field.setter, type_name, keyword
    ));
    out.push_str(&format!("\tx->{} = v;\n", field.name));
    out.push_str("}\n");
}

// ============================================================================
// Registration artifact
// ============================================================================

/// Render `scripts.generated.h` and `scripts.generated.cpp` for every type
/// in the project, in the given order.
pub fn render_registration(types: &[TypeInfo]) -> Registration {
    Registration {
        header: render_registration_header(),
        source: render_registration_source(types),
    }
}

fn render_registration_header() -> String {
    let mut out = String::new();
    out.push_str("#pragma once\n\n");
    out.push_str(&format!("#include \"{}\"\n\n", SUPPORT_HEADER_NAME));
    out.push_str(&format!(
        "extern \"C\" NS_EXPORT void {}(int* count, const ns_script_info** scripts);\n",
        REGISTRATION_SYMBOL
    ));
    out
}

fn render_registration_source(types: &[TypeInfo]) -> String {
    let mut out = String::new();
    out.push_str(&format!("#include \"{}\"\n", REGISTRATION_HEADER));

    for (index, info) in types.iter().enumerate() {
        if !info.fields.is_empty() {
            out.push('\n');
            render_field_table(&mut out, index, &info.fields);
        }
        if !info.methods.is_empty() {
            out.push('\n');
            render_method_table(&mut out, index, &info.methods);
        }
    }

    if !types.is_empty() {
        out.push_str("\nstatic const ns_script_info ns_scripts[] = {\n");
        for (index, info) in types.iter().enumerate() {
            let fields = array_ref(&format!("ns_fields_{}", index), info.fields.len());
            let methods = array_ref(&format!("ns_methods_{}", index), info.methods.len());
            out.push_str(&format!(
                "\t{{ \"{}\", {}, {}, {}, {}, \"{}\", \"{}\" }},\n",
                info.name,
                fields,
                info.fields.len(),
                methods,
                info.methods.len(),
                info.create,
                info.destroy
            ));
        }
        out.push_str("};\n");
    }

    out.push_str(&format!(
        "\nextern \"C\" void {}(int* count, const ns_script_info** scripts) {{\n",
        REGISTRATION_SYMBOL
    ));
    out.push_str(&format!("\t*count = {};\n", types.len()));
    if types.is_empty() {
        out.push_str("\t*scripts = nullptr;\n");
    } else {
        out.push_str("\t*scripts = ns_scripts;\n");
    }
    out.push_str("}\n");

    out
}

fn render_field_table(out: &mut String, index: usize, fields: &[FieldInfo]) {
    out.push_str(&format!("static const ns_field_info ns_fields_{}[] = {{\n", index));
    for field in fields {
        out.push_str(&format!(
            "\t{{ {}, \"{}\", \"{}\", \"{}\" }},\n",
            field.ty.tag(),
            field.name,
            field.getter,
            field.setter
        ));
    }
    out.push_str("};\n");
}

fn render_method_table(out: &mut String, index: usize, methods: &[MethodInfo]) {
    for (m, method) in methods.iter().enumerate() {
        if !method.parameters.is_empty() {
            let tags: Vec<String> = method.parameters.iter().map(|t| t.tag().to_string()).collect();
            out.push_str(&format!(
                "static const int ns_params_{}_{}[] = {{ {} }};\n",
                index,
                m,
                tags.join(", ")
            ));
        }
    }

    out.push_str(&format!("static const ns_method_info ns_methods_{}[] = {{\n", index));
    for (m, method) in methods.iter().enumerate() {
        let parameters = array_ref(&format!("ns_params_{}_{}", index, m), method.parameters.len());
        out.push_str(&format!(
            "\t{{ \"{}\", {}, {}, {} }},\n",
            method.name,
            parameters,
            method.parameters.len(),
            method.return_type.tag()
        ));
    }
    out.push_str("};\n");
}

/// C++ has no zero-length arrays; empty tables are a null pointer.
fn array_ref(name: &str, len: usize) -> String {
    if len == 0 {
        "nullptr".to_string()
    } else {
        name.to_string()
    }
}
