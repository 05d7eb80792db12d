use lumen_native::demos::normal_mapping::NormalMapping;

fn main()
{
  lumen_native::launch::<NormalMapping>();
}
