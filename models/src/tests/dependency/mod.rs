mod builder;
mod set;
