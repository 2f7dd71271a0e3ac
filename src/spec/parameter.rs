use crate::imports::*;

/*
    Types:
    * ParameterSpec - Declaration of one filter parameter (key, label, hint, type, default, constraints)

    Macros:
    * args! - Creates Arguments from key-value pairs
*/
#[macro_export]
macro_rules! args {
    () => {
        $crate::prelude::Arguments::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::prelude::Arguments::new();
        $(
            map.insert($key, $value);
        )+
        map
    }};
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub(crate) key: &'static str,
    pub(crate) label: &'static str,
    pub(crate) hint: Option<&'static str>,
    pub(crate) ty: ParamType,
    pub(crate) default_value: Option<ArgValue>,
    pub(crate) constraints: Vec<Constraint>,
}

impl ParameterSpec {
    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn hint(&self) -> Option<&'static str> {
        self.hint
    }

    pub fn ty(&self) -> &ParamType {
        &self.ty
    }

    pub fn default_value(&self) -> Option<&ArgValue> {
        self.default_value.as_ref()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
}
