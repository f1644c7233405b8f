pub(crate) mod string;
