use lumen_native::demos::reflection::Reflection;

fn main()
{
  lumen_native::launch::<Reflection>();
}
